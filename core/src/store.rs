//! Widget State Store
//!
//! The single owner of message list, draft, balance and phase. Mutations go
//! through narrow methods so the append-only invariant holds by construction.

use crate::messages::{ChatMessage, WidgetPhase};
use crate::view::WidgetView;

/// Widget state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatStore {
    messages: Vec<ChatMessage>,
    draft: String,
    tokens: i64,
    phase: WidgetPhase,
}

impl ChatStore {
    /// Create an empty store seeded with a token balance
    #[must_use]
    pub fn new(initial_tokens: i64) -> Self {
        Self {
            tokens: initial_tokens,
            ..Self::default()
        }
    }

    /// Messages, oldest first
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current draft
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Token balance
    #[must_use]
    pub fn tokens(&self) -> i64 {
        self.tokens
    }

    /// Loading phase
    #[must_use]
    pub fn phase(&self) -> WidgetPhase {
        self.phase
    }

    /// Replace the draft
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Clear the draft
    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Overwrite the balance
    pub fn set_tokens(&mut self, tokens: i64) {
        self.tokens = tokens;
    }

    /// Change phase
    pub fn set_phase(&mut self, phase: WidgetPhase) {
        self.phase = phase;
    }

    /// Append a message and return its index
    pub fn append(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Place loaded history before the session's own messages
    ///
    /// Messages already in the store keep their relative order and stay
    /// after the history.
    pub fn prepend_history(&mut self, history: Vec<ChatMessage>) {
        if history.is_empty() {
            return;
        }
        let session = std::mem::replace(&mut self.messages, history);
        self.messages.extend(session);
    }

    /// Project into a renderable view
    #[must_use]
    pub fn view(&self) -> WidgetView {
        WidgetView::project(&self.messages, &self.draft, self.tokens, self.phase)
    }
}
