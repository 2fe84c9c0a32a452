//! HTTP transport for the Flow REST API.
//!
//! This module provides the reqwest-backed client and the wire-level
//! request/response types.

mod client;
mod endpoints;

pub(crate) use client::{DEFAULT_API_VERSION, HttpClient};
pub(crate) use endpoints::*;
