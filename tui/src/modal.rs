//! Modal Dialogs
//!
//! Terminal stand-ins for the browser's blocking `alert()` and `prompt()`.
//! While a modal is open it receives every key; the chat underneath does not.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tokenchat_core::{DEFAULT_PURCHASE_AMOUNT, PURCHASE_PROMPT};

/// An open modal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Modal {
    /// A message the user acknowledges
    Alert {
        /// Text
        message: String,
    },
    /// A question with an editable answer
    Prompt {
        /// Question text
        question: String,
        /// Current answer
        input: String,
    },
}

/// What a key press did to the modal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalOutcome {
    /// Still open
    Open,
    /// An alert was acknowledged
    Dismissed,
    /// The prompt was answered
    Confirmed(String),
    /// The prompt was cancelled
    Cancelled,
}

impl Modal {
    /// An alert
    pub fn alert(message: impl Into<String>) -> Self {
        Self::Alert {
            message: message.into(),
        }
    }

    /// The token purchase prompt, pre-filled with the default amount
    pub fn purchase() -> Self {
        Self::Prompt {
            question: PURCHASE_PROMPT.to_string(),
            input: DEFAULT_PURCHASE_AMOUNT.to_string(),
        }
    }

    /// Title for the frame
    pub fn title(&self) -> &'static str {
        match self {
            Self::Alert { .. } => " Alert ",
            Self::Prompt { .. } => " Buy tokens ",
        }
    }

    /// Key hint shown at the bottom of the frame
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Alert { .. } => "Enter/Esc: OK",
            Self::Prompt { .. } => "Enter: OK  Esc: Cancel",
        }
    }

    /// Feed a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome {
        match self {
            Self::Alert { .. } => match key.code {
                KeyCode::Enter | KeyCode::Esc => ModalOutcome::Dismissed,
                _ => ModalOutcome::Open,
            },
            Self::Prompt { input, .. } => match key.code {
                KeyCode::Enter => ModalOutcome::Confirmed(std::mem::take(input)),
                KeyCode::Esc => ModalOutcome::Cancelled,
                KeyCode::Backspace => {
                    input.pop();
                    ModalOutcome::Open
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.push(c);
                    ModalOutcome::Open
                }
                _ => ModalOutcome::Open,
            },
        }
    }
}
