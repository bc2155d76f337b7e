//! Authenticating client
//!
//! Owns the client-credentials token lifecycle and stamps every outbound
//! request with a bearer token before handing it to the transport.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::token::{TokenInfo, TokenResponse};
use crate::config::{ClientConfig, has_scheme};
use crate::transport::{HttpClient, HttpRequest, HttpResponse, ReqwestTransport};
use crate::{Error, Result};

/// OneLogin OAuth2 token endpoint
pub const DEFAULT_TOKEN_PATH: &str = "/auth/oauth2/v2/token";

/// HTTP client that authenticates against OneLogin before every request
pub struct OneLoginClient<T = ReqwestTransport> {
    /// Validated configuration
    config: ClientConfig,

    /// Resolved API host, computed once at construction
    base_url: String,

    /// `base64(client_id:client_secret)`
    credential: String,

    /// Transport adapter
    transport: T,

    /// Cached token; the lock is held across a refresh so concurrent
    /// callers share one in-flight token request
    token: Mutex<Option<TokenInfo>>,
}

impl OneLoginClient<ReqwestTransport> {
    /// Create a client backed by reqwest, using the configured timeout
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(config, transport)
    }
}

impl<T: HttpClient> OneLoginClient<T> {
    /// Create a client on top of an arbitrary transport
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the client ID or secret is empty, or if no
    /// API host can be resolved.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let base_url = config.resolved_base_url()?;
        let credential = STANDARD.encode(format!("{}:{}", config.client_id, config.client_secret));

        info!(base_url = %base_url, "OneLogin client configured");

        Ok(Self {
            config,
            base_url,
            credential,
            transport,
            token: Mutex::new(None),
        })
    }

    /// Resolved API host
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configuration this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport adapter
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a valid access token from the default token endpoint
    pub async fn get_access_token(&self) -> Result<String> {
        self.get_access_token_at(DEFAULT_TOKEN_PATH).await
    }

    /// Get a valid access token, requesting a new one from `auth_path` only
    /// when the cached token is missing or expired
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the token request fails; the
    /// cached token is left as it was.
    pub async fn get_access_token_at(&self, auth_path: &str) -> Result<String> {
        Ok(self.token_at(auth_path).await?.access_token)
    }

    /// Cached token if still valid, otherwise a freshly requested one
    async fn token_at(&self, auth_path: &str) -> Result<TokenInfo> {
        let mut cached = self.token.lock().await;

        if let Some(ref token) = *cached {
            if token.is_valid_at(Utc::now()) {
                debug!("Using cached access token");
                return Ok(token.clone());
            }
            debug!(expired_at = %token.expires_at, "Cached access token expired");
        }

        let token = self.request_token(auth_path).await?;

        info!(expires_at = %token.expires_at, "Acquired access token");
        *cached = Some(token.clone());

        Ok(token)
    }

    /// Check if a usable token is cached, without touching the network
    pub async fn has_valid_token(&self) -> bool {
        self.token.lock().await.as_ref().is_some_and(TokenInfo::is_valid)
    }

    /// Drop the cached token so the next request re-authenticates
    pub async fn invalidate_token(&self) {
        *self.token.lock().await = None;
        debug!("Access token invalidated");
    }

    /// Perform the client-credentials grant
    async fn request_token(&self, auth_path: &str) -> Result<TokenInfo> {
        let request = HttpRequest::post(self.absolute_url(auth_path))
            .with_header("Authorization", format!("Basic {}", self.credential))
            .with_header("Content-Type", "application/json")
            .with_data(json!({ "grant_type": "client_credentials" }));

        debug!(path = %auth_path, "Requesting access token");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| Error::Authentication(format!("Token request failed: {e}")))?;

        if !response.is_success() {
            warn!(status = response.status, "Token endpoint rejected client credentials");
            return Err(Error::Authentication(format!(
                "Token request failed: HTTP {} {}",
                response.status, response.status_text
            )));
        }

        let body: TokenResponse = serde_json::from_value(response.data)
            .map_err(|e| Error::Authentication(format!("Failed to parse token response: {e}")))?;

        TokenInfo::from_response(body, Utc::now())
    }

    /// Prefix relative paths with the resolved base URL
    fn absolute_url(&self, url: &str) -> String {
        if has_scheme(url) {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }
}

#[async_trait]
impl<T: HttpClient> HttpClient for OneLoginClient<T> {
    /// Authorize and send a request
    ///
    /// Every failure is returned to the caller: authentication errors as
    /// [`Error::Authentication`], non-2xx responses as [`Error::Request`],
    /// adapter failures as [`Error::Transport`] or [`Error::Http`].
    async fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        let token = self.token_at(DEFAULT_TOKEN_PATH).await?;
        if !token.is_valid_at(Utc::now()) {
            warn!(expired_at = %token.expires_at, "Token endpoint issued an expired access token");
            return Err(Error::Authentication(
                "Token endpoint issued an already expired access token".to_string(),
            ));
        }

        request.set_header("Authorization", format!("Bearer {}", token.access_token));
        request.url = self.absolute_url(&request.url);

        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            debug!(%method, url = %url, status = response.status, "Request returned error status");
            return Err(Error::request(
                response.status,
                response.status_text,
                response.data,
            ));
        }

        Ok(response)
    }
}
