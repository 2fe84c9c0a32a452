//! The Flow API client: authentication lifecycle and entity operations.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::auth::{ScriptCredentials, TokenState};
use crate::config::EnvConfig;
use crate::entity::Entity;
use crate::error::Error;
use crate::filter::Filter;
use crate::http::{
    DEFAULT_API_VERSION, HttpClient, SearchRequest, SearchResponse, SingleResponse,
    entity_by_id_path, entity_path, entity_search_path,
};
use crate::types::SiteUrl;

/// A client for one Flow Production Tracking site.
///
/// The client authenticates at construction and keeps its token fresh
/// lazily: every operation checks the recorded expiry and re-runs the
/// client-credentials exchange when the token is within 60 seconds of
/// expiring. There is no background refresh.
///
/// # Thread Safety
///
/// Clients are cheap to clone (they use an internal `Arc`) and are safe
/// to share across tasks. The refresh-and-read sequence is synchronized
/// internally, so concurrent callers trigger at most one token exchange.
///
/// # Example
///
/// ```no_run
/// use flowtrack::{FlowClient, ScriptCredentials, SiteUrl};
///
/// # async fn example() -> Result<(), flowtrack::Error> {
/// let site = SiteUrl::new("https://yoursite.shotgunstudio.com")?;
/// let credentials = ScriptCredentials::new("pipeline_script", "script-key");
/// let client = FlowClient::connect(&site, credentials).await?;
///
/// let shots = client.get_shots(Some(7), &[]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FlowClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    credentials: ScriptCredentials,
    tokens: RwLock<TokenState>,
}

/// Builder for [`FlowClient`] with optional overrides.
#[derive(Debug)]
pub struct FlowClientBuilder {
    site: SiteUrl,
    credentials: ScriptCredentials,
    api_version: Option<String>,
    transport: Option<reqwest::Client>,
}

impl FlowClient {
    /// Connect to a site with the default API version and transport.
    ///
    /// Performs exactly one token exchange before returning; the client is
    /// handed back already authenticated.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for missing credentials (before any
    /// network call), or an authentication/transport error from the
    /// token exchange.
    pub async fn connect(site: &SiteUrl, credentials: ScriptCredentials) -> Result<Self, Error> {
        Self::builder(site.clone(), credentials).connect().await
    }

    /// Start building a client with optional overrides.
    pub fn builder(site: SiteUrl, credentials: ScriptCredentials) -> FlowClientBuilder {
        FlowClientBuilder {
            site,
            credentials,
            api_version: None,
            transport: None,
        }
    }

    /// Connect using the `FLOW_SITE_URL`, `FLOW_SCRIPT_NAME`, and
    /// `FLOW_SCRIPT_KEY` environment variables.
    ///
    /// `.env` loading is the caller's choice; see
    /// [`load_dotenv`](crate::load_dotenv).
    pub async fn from_env() -> Result<Self, Error> {
        let config = EnvConfig::from_env()?;
        let site = SiteUrl::new(config.site_url())?;
        Self::connect(&site, config.into_credentials()).await
    }

    /// Re-run the client-credentials exchange and replace the session record.
    ///
    /// The access token, refresh token, and expiry are replaced together in
    /// one assignment; no partial update is observable. No retry is
    /// attempted.
    #[instrument(skip(self), fields(site = %self.inner.http.site()))]
    pub async fn authenticate(&self) -> Result<(), Error> {
        info!("exchanging script credentials for an access token");
        let response = self.inner.http.token_exchange(&self.inner.credentials).await?;
        *self.inner.tokens.write().await = TokenState::from_exchange(response, Utc::now());
        Ok(())
    }

    /// True iff a non-empty token exists and has not expired.
    ///
    /// Purely observational; never triggers a refresh.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.tokens.read().await.is_valid(Utc::now())
    }

    /// Export the current refresh token for persistence.
    ///
    /// # Security
    ///
    /// Handle the returned token securely.
    pub async fn refresh_token(&self) -> Option<String> {
        let tokens = self.inner.tokens.read().await;
        tokens
            .refresh_token
            .as_ref()
            .map(|t| t.as_str().to_string())
    }

    /// Return a token that is valid for at least the safety margin,
    /// re-authenticating if needed.
    ///
    /// This is the sole refresh trigger. Double-checked under the write
    /// lock so concurrent callers perform at most one exchange.
    pub(crate) async fn valid_token(&self) -> Result<String, Error> {
        {
            let tokens = self.inner.tokens.read().await;
            if !tokens.needs_refresh(Utc::now()) {
                return Ok(tokens.access_token.as_str().to_string());
            }
        }

        let mut tokens = self.inner.tokens.write().await;
        if tokens.needs_refresh(Utc::now()) {
            debug!("access token within refresh margin, re-authenticating");
            let response = self.inner.http.token_exchange(&self.inner.credentials).await?;
            *tokens = TokenState::from_exchange(response, Utc::now());
        }
        Ok(tokens.access_token.as_str().to_string())
    }

    // ========================================================================
    // Entity Operations
    // ========================================================================

    /// Search for entities of a given type.
    ///
    /// `filters` is passed through as the request body's `filters` field
    /// (an empty array when none are supplied); `fields` becomes a
    /// comma-joined query parameter. Each returned envelope item is
    /// flattened into an [`Entity`].
    #[instrument(skip(self, filters), fields(site = %self.inner.http.site()))]
    pub async fn find_entities(
        &self,
        entity_type: &str,
        filters: &[Filter],
        fields: &[&str],
    ) -> Result<Vec<Entity>, Error> {
        debug!(entity_type, "searching entities");

        let token = self.valid_token().await?;
        let body = SearchRequest { filters };
        let response: SearchResponse = self
            .inner
            .http
            .post_search(
                &entity_search_path(entity_type),
                &fields_query(fields),
                &body,
                &token,
            )
            .await?;

        Ok(response.data.into_iter().map(Entity::from_record).collect())
    }

    /// Retrieve a single entity by id.
    #[instrument(skip(self), fields(site = %self.inner.http.site()))]
    pub async fn get_entity(
        &self,
        entity_type: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Entity, Error> {
        debug!(entity_type, id, "fetching entity");

        let token = self.valid_token().await?;
        let response: SingleResponse = self
            .inner
            .http
            .get(
                &entity_by_id_path(entity_type, id),
                &fields_query(fields),
                &token,
            )
            .await?;

        Ok(Entity::from_record(response.data))
    }

    /// Create a new entity.
    ///
    /// `data` is the caller-supplied field/value mapping, including nested
    /// `{type, id}` references for relationship links. Expects a 201
    /// response, flattened like the other operations.
    #[instrument(skip(self, data), fields(site = %self.inner.http.site()))]
    pub async fn create_entity(
        &self,
        entity_type: &str,
        data: &Map<String, Value>,
    ) -> Result<Entity, Error> {
        debug!(entity_type, "creating entity");

        let token = self.valid_token().await?;
        let response: SingleResponse = self
            .inner
            .http
            .post_json(&entity_path(entity_type), data, &token)
            .await?;

        Ok(Entity::from_record(response.data))
    }
}

impl FlowClientBuilder {
    /// Override the API version (default `"v1.1"`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Override the HTTP transport.
    ///
    /// The supplied client's own timeout configuration replaces the
    /// default 30 second timeout.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.transport = Some(client);
        self
    }

    /// Validate the credentials, authenticate, and return the client.
    #[instrument(skip(self), fields(site = %self.site))]
    pub async fn connect(self) -> Result<FlowClient, Error> {
        self.credentials.ensure_present()?;

        info!("creating Flow client");
        let http = HttpClient::new(
            self.site,
            self.api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            self.transport,
        );

        // One exchange up front; the client is returned already authenticated.
        let response = http.token_exchange(&self.credentials).await?;
        let tokens = RwLock::new(TokenState::from_exchange(response, Utc::now()));

        Ok(FlowClient {
            inner: Arc::new(ClientInner {
                http,
                credentials: self.credentials,
                tokens,
            }),
        })
    }
}

fn fields_query(fields: &[&str]) -> Vec<(&'static str, String)> {
    if fields.is_empty() {
        Vec::new()
    } else {
        vec![("fields", fields.join(","))]
    }
}

// Custom Debug impl that hides credentials and token state
impl std::fmt::Debug for FlowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowClient")
            .field("site", &self.inner.http.site().as_str())
            .field("credentials", &self.inner.credentials)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
