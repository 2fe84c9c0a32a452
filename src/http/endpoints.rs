//! Endpoint path builders and wire-level request/response types.

use serde::{Deserialize, Serialize};

use crate::auth::ScriptCredentials;
use crate::entity::EntityRecord;
use crate::filter::Filter;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Path of the OAuth2 token endpoint, relative to `{base}/api/{version}/`.
pub(crate) const ACCESS_TOKEN_PATH: &str = "auth/access_token";

/// `entity/{entity_type}` - entity creation.
pub(crate) fn entity_path(entity_type: &str) -> String {
    format!("entity/{}", entity_type)
}

/// `entity/{entity_type}/_search` - entity search.
pub(crate) fn entity_search_path(entity_type: &str) -> String {
    format!("entity/{}/_search", entity_type)
}

/// `entity/{entity_type}/{id}` - fetch by id.
pub(crate) fn entity_by_id_path(entity_type: &str, id: i64) -> String {
    format!("entity/{}/{}", entity_type, id)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Form body for the client-credentials token exchange.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub(crate) fn client_credentials(credentials: &'a ScriptCredentials) -> Self {
        Self {
            grant_type: "client_credentials",
            client_id: credentials.script_name(),
            client_secret: credentials.script_key(),
        }
    }
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[allow(dead_code)]
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: String,
}

/// Request body for entity search.
///
/// `filters` is always serialized, as an empty array when no filters
/// were supplied, never as an absent field.
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub filters: &'a [Filter],
}

/// Response envelope for entity search: `{ "data": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub data: Vec<EntityRecord>,
}

/// Response envelope for get-by-id and create: `{ "data": { ... } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct SingleResponse {
    pub data: EntityRecord,
}
