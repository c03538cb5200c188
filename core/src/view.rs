//! View Projection
//!
//! [`WidgetView`] is a pure function of widget state. Surfaces draw it and
//! never derive enablement or labels on their own.

use crate::messages::{ChatMessage, Role, WidgetPhase};

/// Placeholder while the input is usable
pub const PLACEHOLDER_READY: &str = "Send a message...";

/// Placeholder once the balance is exhausted
pub const PLACEHOLDER_OUT_OF_TOKENS: &str = "Out of tokens — buy more to continue.";

/// Send control label while idle
pub const SEND_LABEL: &str = "Send";

/// Send control label while a send is in flight
pub const SENDING_LABEL: &str = "Sending...";

/// One rendered message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRow {
    /// Position in the message list; stable because the list is append-only
    pub key: usize,
    /// Author, which selects the row style
    pub role: Role,
    /// Text
    pub content: String,
}

/// Everything a surface needs to draw the widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetView {
    /// Message rows, oldest first
    pub rows: Vec<MessageRow>,
    /// Current draft
    pub draft: String,
    /// Token balance
    pub tokens: i64,
    /// Whether a send is in flight
    pub loading: bool,
    /// Whether the input and send control accept interaction
    pub input_enabled: bool,
    /// Input placeholder
    pub placeholder: &'static str,
    /// Send control label
    pub send_label: &'static str,
}

/// Whether the input accepts typing and sending
///
/// Closed while out of tokens or while a send is in flight.
#[must_use]
pub fn accepts_input(tokens: i64, phase: WidgetPhase) -> bool {
    tokens > 0 && !phase.is_loading()
}

impl WidgetView {
    /// Project widget state into a view
    #[must_use]
    pub fn project(messages: &[ChatMessage], draft: &str, tokens: i64, phase: WidgetPhase) -> Self {
        let loading = phase.is_loading();
        let rows = messages
            .iter()
            .enumerate()
            .map(|(key, message)| MessageRow {
                key,
                role: message.role,
                content: message.content.clone(),
            })
            .collect();

        Self {
            rows,
            draft: draft.to_string(),
            tokens,
            loading,
            input_enabled: accepts_input(tokens, phase),
            placeholder: if tokens > 0 {
                PLACEHOLDER_READY
            } else {
                PLACEHOLDER_OUT_OF_TOKENS
            },
            send_label: if loading { SENDING_LABEL } else { SEND_LABEL },
        }
    }

    /// Whether the placeholder should show instead of the draft
    #[must_use]
    pub fn shows_placeholder(&self) -> bool {
        self.draft.is_empty()
    }
}
