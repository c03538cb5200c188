//! Display State
//!
//! The TUI's copy of widget state, built only from [`WidgetMessage`]s, plus
//! the draft the user is typing. Rendering reads a [`WidgetView`] projected
//! from it, so enablement and labels come from the same rules as the core.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the widget tells it to.
//! The draft is the one exception: keystrokes edit it locally and are
//! reported to the widget as `DraftChanged`.

use std::collections::VecDeque;

use tokenchat_core::{accepts_input, ChatMessage, WidgetMessage, WidgetPhase, WidgetView};

/// The full display state for the TUI
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,
    /// Input text
    pub draft: String,
    /// Token balance
    pub tokens: i64,
    /// Loading phase
    pub phase: WidgetPhase,
    /// Alerts waiting to be shown, oldest first
    pub alerts: VecDeque<String>,
    /// The widget asked the surface to shut down
    pub quit_requested: bool,
    /// Bumped whenever the message list changes; drives auto-scroll
    pub messages_version: u64,
}

impl DisplayState {
    /// Create a display state seeded with the starting balance
    pub fn new(initial_tokens: i64) -> Self {
        Self {
            tokens: initial_tokens,
            ..Self::default()
        }
    }

    /// Apply a widget message
    pub fn apply_message(&mut self, msg: WidgetMessage) {
        match msg {
            WidgetMessage::HistoryLoaded { messages } => {
                if messages.is_empty() {
                    return;
                }
                let session = std::mem::replace(&mut self.messages, messages);
                self.messages.extend(session);
                self.messages_version += 1;
            }
            WidgetMessage::MessageAppended { index, message } => {
                if index != self.messages.len() {
                    tracing::warn!(
                        index,
                        len = self.messages.len(),
                        "Appended message index out of step with display"
                    );
                }
                self.messages.push(message);
                self.messages_version += 1;
            }
            WidgetMessage::TokensChanged { tokens } => {
                self.tokens = tokens;
            }
            WidgetMessage::PhaseChanged { phase } => {
                self.phase = phase;
            }
            WidgetMessage::DraftCleared => {
                self.draft.clear();
            }
            WidgetMessage::Alert { message } => {
                self.alerts.push_back(message);
            }
            WidgetMessage::Quit => {
                self.quit_requested = true;
            }
        }
    }

    /// Renderable projection
    pub fn view(&self) -> WidgetView {
        WidgetView::project(&self.messages, &self.draft, self.tokens, self.phase)
    }

    /// Whether typing and sending are currently accepted
    pub fn input_enabled(&self) -> bool {
        accepts_input(self.tokens, self.phase)
    }

    /// Take the oldest pending alert
    pub fn next_alert(&mut self) -> Option<String> {
        self.alerts.pop_front()
    }
}
