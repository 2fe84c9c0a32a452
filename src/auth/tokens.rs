//! Token types and the mutable session record.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::http::TokenResponse;

/// Tokens within this margin of expiry are refreshed before use.
pub(crate) const REFRESH_MARGIN_SECS: i64 = 60;

/// An access token for authenticated API requests.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub(crate) struct AccessToken(String);

impl AccessToken {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token returned by the token endpoint.
///
/// Recorded alongside the access token; re-authentication uses the
/// client-credentials grant rather than a refresh grant, so this is held
/// only for callers that want to persist it.
#[derive(Clone)]
pub(crate) struct RefreshToken(String);

impl RefreshToken {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// The single mutable session record.
///
/// A refresh replaces the whole struct in one assignment under the client's
/// write lock, so the three volatile fields never partially update.
#[derive(Debug)]
pub(crate) struct TokenState {
    pub(crate) access_token: AccessToken,
    pub(crate) refresh_token: Option<RefreshToken>,
    pub(crate) expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Build a session record from a successful token exchange.
    pub(crate) fn from_exchange(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let refresh_token = if response.refresh_token.is_empty() {
            None
        } else {
            Some(RefreshToken::new(response.refresh_token))
        };

        Self {
            access_token: AccessToken::new(response.access_token),
            refresh_token,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    /// True once the current time is within the safety margin of expiry.
    pub(crate) fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }

    /// True iff a non-empty token exists and has not expired.
    ///
    /// Purely observational; never triggers a refresh.
    pub(crate) fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.as_str().is_empty() && now < self.expires_at
    }
}
