//! Surface Events
//!
//! Events sent from a UI surface to the chat widget core. Surfaces report what
//! the user did; the widget decides what it means.

use serde::{Deserialize, Serialize};

/// Events from UI surface to the widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// The surface is on screen; triggers the one-time history load
    Mounted,

    /// The user edited the input
    DraftChanged {
        /// Full draft text after the edit
        text: String,
    },

    /// The user pressed send
    SendRequested,

    /// The user answered (or dismissed) the purchase prompt
    PurchaseAnswered {
        /// Raw prompt answer; `None` when the prompt was cancelled
        answer: Option<String>,
    },

    /// The user asked to quit
    QuitRequested,
}

impl SurfaceEvent {
    /// Short name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::DraftChanged { .. } => "draft_changed",
            Self::SendRequested => "send_requested",
            Self::PurchaseAnswered { .. } => "purchase_answered",
            Self::QuitRequested => "quit_requested",
        }
    }
}
