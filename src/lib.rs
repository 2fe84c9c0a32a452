//! flowtrack - Flow Production Tracking REST client
//!
//! This library provides a thin async client for the Flow Production
//! Tracking REST API with a client-centric surface: a [`FlowClient`]
//! authenticates at construction via the OAuth2 client-credentials grant,
//! keeps its token fresh lazily, and exposes entity search, fetch, and
//! create operations returning flat [`Entity`] records.
//!
//! # Example
//!
//! ```no_run
//! use flowtrack::{Filter, FlowClient, ScriptCredentials, SiteUrl};
//!
//! # async fn example() -> Result<(), flowtrack::Error> {
//! let site = SiteUrl::new("https://yoursite.shotgunstudio.com")?;
//! let credentials = ScriptCredentials::new("pipeline_script", "script-key");
//! let client = FlowClient::connect(&site, credentials).await?;
//!
//! let shots = client
//!     .find_entities("shots", &[Filter::is("sg_status_list", "ip")], &["code"])
//!     .await?;
//!
//! for shot in shots {
//!     println!("{}: {:?}", shot.id(), shot.get_str("code"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod http;
pub mod types;

mod queries;

// Re-export primary types at crate root for convenience
pub use auth::ScriptCredentials;
pub use client::{FlowClient, FlowClientBuilder};
pub use config::{DEFAULT_DOTENV_CANDIDATES, EnvConfig, load_dotenv};
pub use entity::Entity;
pub use error::Error;
pub use filter::{EntityRef, Filter, FilterOp};
pub use types::SiteUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
