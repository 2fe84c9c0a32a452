//! Validated value types.

mod site_url;

pub use site_url::SiteUrl;
