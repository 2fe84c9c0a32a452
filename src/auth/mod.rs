//! Script credentials and token state.
//!
//! This module provides the authentication primitives for the Flow REST API.
//! The token exchange itself is performed by [`FlowClient`](crate::FlowClient).

mod credentials;
mod tokens;

pub use credentials::ScriptCredentials;
pub(crate) use tokens::TokenState;
