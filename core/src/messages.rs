//! Widget Messages
//!
//! Messages sent from the chat widget core to a UI surface. The surface keeps
//! a display copy of the widget state and updates it only from these messages.
//!
//! # Design Philosophy
//!
//! The core owns every piece of business state (message list, draft, token
//! balance, loading phase). Surfaces are renderers: they report what the user
//! did through [`SurfaceEvent`](crate::events::SurfaceEvent) and draw what they
//! are told here.

use serde::{Deserialize, Serialize};

/// Messages from the widget core to the UI surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetMessage {
    /// Recent history arrived; place these messages before anything already shown
    HistoryLoaded {
        /// Messages in server order (oldest first)
        messages: Vec<ChatMessage>,
    },

    /// A message was appended at `index`
    MessageAppended {
        /// Position in the message list (rows are keyed by position)
        index: usize,
        /// The appended message
        message: ChatMessage,
    },

    /// Token balance was overwritten with a server-reported value
    TokensChanged {
        /// New balance
        tokens: i64,
    },

    /// Loading phase changed
    PhaseChanged {
        /// The new phase
        phase: WidgetPhase,
    },

    /// The draft was cleared after a send attempt
    DraftCleared,

    /// Show a blocking alert to the user
    Alert {
        /// Alert text
        message: String,
    },

    /// The surface should shut down
    Quit,
}

/// Who authored a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Typed by the user
    User,
    /// Reply from the server
    Bot,
}

impl Role {
    /// Wire name of the role
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }

    /// Whether this role is the local user
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User)
    }
}

// Anything that is not "user" renders as the bot.
impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == "user" {
            Self::User
        } else {
            Self::Bot
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message; immutable once appended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: Role,
    /// Text content
    pub content: String,
}

impl ChatMessage {
    /// Create a message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a bot message
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content)
    }
}

/// Loading phase: the widget's only state machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetPhase {
    /// No send in flight
    #[default]
    Idle,
    /// A send is in flight
    Sending,
}

impl WidgetPhase {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Sending => "Sending...",
        }
    }

    /// Whether a send is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Sending)
    }
}
