//! Chat API Traits
//!
//! The widget talks to the chat server only through [`ChatApi`]. The HTTP
//! implementation lives in [`super::HttpChatApi`]; tests plug in mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::messages::ChatMessage;

/// Path of the history endpoint
pub const MESSAGES_PATH: &str = "/api/messages/";
/// Path of the chat endpoint
pub const CHAT_PATH: &str = "/api/chat/";
/// Path of the token purchase endpoint
pub const ADD_TOKENS_PATH: &str = "/api/tokens/add/";

/// Response of `GET /api/messages/`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Whether the request succeeded
    pub ok: bool,
    /// Messages, oldest first
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

/// One history entry as the server sends it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Wire role
    pub role: String,
    /// Message text
    pub content: String,
    /// Server timestamp, not shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        ChatMessage::new(entry.role.into(), entry.content)
    }
}

/// Body of `POST /api/chat/`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,
}

/// Response of `POST /api/chat/`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Whether the message was accepted
    pub ok: bool,
    /// Bot reply (present when `ok`)
    #[serde(default)]
    pub reply: Option<String>,
    /// Balance after the message
    #[serde(default)]
    pub tokens: Option<i64>,
    /// Error text (present when not `ok`)
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatResponse {
    /// Successful reply
    pub fn success(reply: impl Into<String>, tokens: i64) -> Self {
        Self {
            ok: true,
            reply: Some(reply.into()),
            tokens: Some(tokens),
            error: None,
        }
    }

    /// Logical failure
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Body of `POST /api/tokens/add/`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTokensRequest {
    /// Number of tokens to buy
    pub amount: i64,
}

/// Response of `POST /api/tokens/add/`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensResponse {
    /// Whether the purchase went through
    pub ok: bool,
    /// Balance after the purchase
    #[serde(default)]
    pub tokens: Option<i64>,
    /// Error text (present when not `ok`)
    #[serde(default)]
    pub error: Option<String>,
}

impl TokensResponse {
    /// Successful purchase
    #[must_use]
    pub fn success(tokens: i64) -> Self {
        Self {
            ok: true,
            tokens: Some(tokens),
            error: None,
        }
    }

    /// Logical failure
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            tokens: None,
            error: Some(error.into()),
        }
    }
}

/// Chat server API
///
/// `Ok` means the server answered with a decodable body, whatever its `ok`
/// field says. `Err` is a network-class failure.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Fetch the most recent `limit` messages
    async fn fetch_history(&self, limit: usize) -> Result<HistoryResponse, ApiError>;

    /// Post a chat message
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ApiError>;

    /// Buy `amount` tokens
    async fn add_tokens(&self, amount: i64) -> Result<TokensResponse, ApiError>;
}
