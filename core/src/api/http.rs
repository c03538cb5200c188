//! HTTP Chat API
//!
//! [`ChatApi`] over reqwest. Bodies are JSON both ways. Responses are decoded
//! whatever their HTTP status, because the server reports logical failures
//! (e.g. `402` for an empty balance) as `ok: false` JSON.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::{
    AddTokensRequest, ChatApi, ChatRequest, ChatResponse, HistoryResponse, TokensResponse,
    ADD_TOKENS_PATH, CHAT_PATH, MESSAGES_PATH,
};
use super::ApiError;
use crate::config::WidgetConfig;
use crate::credentials::{CookieCredentials, CredentialProvider, NoCredentials, CSRF_HEADER};

/// Chat server client
#[derive(Clone)]
pub struct HttpChatApi {
    /// Base URL, always ending in `/`
    base_url: Url,
    /// HTTP client
    http_client: reqwest::Client,
    /// Source of the CSRF token and cookies
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpChatApi {
    /// Create a client for the server at `base_url`
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute http(s) URL or the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::Client)?;

        Self::with_client(base_url, http_client, credentials)
    }

    /// Create a client around an existing `reqwest::Client`
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute http(s) URL.
    pub fn with_client(
        base_url: &str,
        http_client: reqwest::Client,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            http_client,
            credentials,
        })
    }

    /// Create from widget configuration
    ///
    /// A configured cookie string becomes [`CookieCredentials`]; without one
    /// requests go out with no cookies and an empty CSRF header.
    ///
    /// # Errors
    ///
    /// See [`HttpChatApi::new`].
    pub fn from_config(config: &WidgetConfig) -> Result<Self, ApiError> {
        let credentials: Arc<dyn CredentialProvider> = match config.cookie {
            Some(ref cookie) => Arc::new(CookieCredentials::with_cookie_name(
                cookie.clone(),
                config.csrf_cookie_name.clone(),
            )),
            None => Arc::new(NoCredentials),
        };
        Self::new(&config.base_url, credentials)
    }

    /// The normalized base URL
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    ///
    /// Paths are joined relative to the base so a base like
    /// `http://host/chat/` keeps its prefix.
    fn endpoint(&self, path: &'static str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })
    }

    /// Start a request with cookies attached
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(cookie) = self.credentials.cookie_header() {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    /// POST a JSON body with the CSRF header and decode the JSON answer
    async fn post_json<B, R>(&self, path: &'static str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let token = self.credentials.csrf_token().unwrap_or_default();

        tracing::debug!(endpoint = path, "POST");
        let response = self
            .request(Method::POST, url)
            .header(CSRF_HEADER, token)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path,
                source,
            })?;

        decode(path, response).await
    }
}

impl std::fmt::Debug for HttpChatApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatApi")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Decode a JSON body regardless of status
async fn decode<R: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<R, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ApiError::Transport { endpoint, source })?;

    if !status.is_success() {
        tracing::debug!(endpoint, status = status.as_u16(), "Non-success status");
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        endpoint,
        status: status.as_u16(),
        source,
    })
}

/// Parse the base URL and make sure it ends in `/`
fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl ChatApi for HttpChatApi {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn fetch_history(&self, limit: usize) -> Result<HistoryResponse, ApiError> {
        let url = self.endpoint(MESSAGES_PATH)?;

        tracing::debug!(endpoint = MESSAGES_PATH, limit, "GET");
        let response = self
            .request(Method::GET, url)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: MESSAGES_PATH,
                source,
            })?;

        decode(MESSAGES_PATH, response).await
    }

    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ApiError> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        self.post_json(CHAT_PATH, &body).await
    }

    async fn add_tokens(&self, amount: i64) -> Result<TokensResponse, ApiError> {
        self.post_json(ADD_TOKENS_PATH, &AddTokensRequest { amount })
            .await
    }
}
