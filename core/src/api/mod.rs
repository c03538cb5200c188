//! Chat Server API
//!
//! Access to the external chat server through a common trait, so the widget
//! can run against the real HTTP server or a test double.
//!
//! # Endpoints
//!
//! - `GET /api/messages/?limit=N` - recent history
//! - `POST /api/chat/` - send a message, get the reply and new balance
//! - `POST /api/tokens/add/` - buy tokens
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokenchat_core::api::{ChatApi, HttpChatApi};
//! use tokenchat_core::credentials::CookieCredentials;
//!
//! let creds = Arc::new(CookieCredentials::new("sessionid=abc; csrftoken=xyz"));
//! let api = HttpChatApi::new("http://localhost:8000", creds)?;
//! let reply = api.send_chat("hello").await?;
//! ```

mod http;
mod traits;

use thiserror::Error;

pub use http::HttpChatApi;
pub use traits::{
    AddTokensRequest, ChatApi, ChatRequest, ChatResponse, HistoryEntry, HistoryResponse,
    TokensResponse, ADD_TOKENS_PATH, CHAT_PATH, MESSAGES_PATH,
};

/// Network-class failures talking to the chat server
///
/// A response that decodes but says `ok: false` is not an `ApiError`; it is
/// returned as a normal response and handled as a logical failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is unusable
    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl {
        /// The URL as configured
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never completed
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint path
        endpoint: &'static str,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something that is not the expected JSON
    #[error("Could not decode {endpoint} response (HTTP {status}): {source}")]
    Decode {
        /// Endpoint path
        endpoint: &'static str,
        /// HTTP status code of the response
        status: u16,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Endpoint the failure is attributed to, if any
    #[must_use]
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Transport { endpoint, .. } | Self::Decode { endpoint, .. } => Some(endpoint),
            Self::InvalidUrl { .. } | Self::Client(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let source = serde_json::from_str::<ChatResponse>("Invalid payload").unwrap_err();
        let err = ApiError::Decode {
            endpoint: CHAT_PATH,
            status: 400,
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("/api/chat/"));
        assert!(msg.contains("400"));
        assert_eq!(err.endpoint(), Some(CHAT_PATH));
    }

    #[test]
    fn test_invalid_url_has_no_endpoint() {
        let err = ApiError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.endpoint().is_none());
        assert!(err.to_string().contains("nope"));
    }
}
