//! Reqwest-backed HTTP client for the Flow REST API.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, trace};

use crate::auth::ScriptCredentials;
use crate::error::{ApiError, AuthError, Error};
use crate::types::SiteUrl;

use super::endpoints::{ACCESS_TOKEN_PATH, TokenRequest, TokenResponse};

/// API version used when the caller does not specify one.
pub(crate) const DEFAULT_API_VERSION: &str = "v1.1";

/// Overall per-request timeout for the default transport.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type the service requires for array-form search bodies.
const SEARCH_CONTENT_TYPE: &str = "application/vnd+shotgun.api3_array+json";

/// HTTP client for Flow REST requests.
///
/// Holds the site base URL and API version; one request per call, no
/// retries, no pagination.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    site: SiteUrl,
    api_version: String,
}

impl HttpClient {
    /// Create a new HTTP client for the given site.
    ///
    /// `transport` overrides the default reqwest client (and with it the
    /// default 30 second timeout).
    pub(crate) fn new(
        site: SiteUrl,
        api_version: String,
        transport: Option<reqwest::Client>,
    ) -> Self {
        let client = transport.unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(concat!("flowtrack/", env!("CARGO_PKG_VERSION")))
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("failed to build HTTP client")
        });

        Self {
            client,
            site,
            api_version,
        }
    }

    /// Returns the site URL this client is configured for.
    pub(crate) fn site(&self) -> &SiteUrl {
        &self.site
    }

    fn url(&self, path: &str) -> String {
        self.site.api_url(&self.api_version, path)
    }

    /// Exchange script credentials for a bearer token.
    ///
    /// Any non-200 status is an authentication error carrying the status
    /// and raw body.
    pub(crate) async fn token_exchange(
        &self,
        credentials: &ScriptCredentials,
    ) -> Result<TokenResponse, Error> {
        let url = self.url(ACCESS_TOKEN_PATH);
        debug!(%url, "token exchange");

        let response = self
            .client
            .post(&url)
            .form(&TokenRequest::client_credentials(credentials))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        trace!(status = %status, "token endpoint response");
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        serde_json::from_str(&body)
            .map_err(|source| AuthError::MalformedResponse { source }.into())
    }

    /// Authenticated GET expecting a 200 JSON response.
    pub(crate) async fn get<R>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        self.expect_json(response, StatusCode::OK).await
    }

    /// Authenticated search POST with the service's array content type,
    /// expecting a 200 JSON response.
    pub(crate) async fn post_search<B, R>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        token: &str,
    ) -> Result<R, Error>
    where
        B: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST (search)");
        trace!(?body, "search body");

        let payload = serde_json::to_vec(body).map_err(|source| Error::Decode {
            message: "failed to encode search request body".to_string(),
            source,
        })?;

        let response = self
            .client
            .post(&url)
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, SEARCH_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await?;

        self.expect_json(response, StatusCode::OK).await
    }

    /// Authenticated JSON POST expecting a 201 response.
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B, token: &str) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        self.expect_json(response, StatusCode::CREATED).await
    }

    /// Read the body, then check the status, then decode.
    ///
    /// Reading as text first keeps the three failure kinds apart: a failed
    /// read is a transport error, an unexpected status is an API error
    /// carrying the literal body, and a JSON mismatch is a decode error.
    async fn expect_json<R>(
        &self,
        response: reqwest::Response,
        expected: StatusCode,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        trace!(status = %status, "response");
        let body = response.text().await?;

        if status != expected {
            return Err(ApiError::new(status.as_u16(), body).into());
        }

        serde_json::from_str(&body).map_err(|source| Error::Decode {
            message: format!("response body did not match the expected shape: {}", source),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_api_version() {
        let site = SiteUrl::new("https://studio.shotgunstudio.com").unwrap();
        let client = HttpClient::new(site, "v1.1".to_string(), None);
        assert_eq!(
            client.url("entity/shots/_search"),
            "https://studio.shotgunstudio.com/api/v1.1/entity/shots/_search"
        );
    }

    #[test]
    fn custom_transport_is_kept() {
        let site = SiteUrl::new("https://studio.shotgunstudio.com").unwrap();
        let transport = reqwest::Client::new();
        let client = HttpClient::new(site.clone(), DEFAULT_API_VERSION.to_string(), Some(transport));
        assert_eq!(client.site().as_str(), site.as_str());
    }
}
