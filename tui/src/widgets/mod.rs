//! Widgets
//!
//! Renderers for each compositor layer. They draw a [`WidgetView`] (or a
//! modal) into a buffer and hold no chat state of their own.
//!
//! [`WidgetView`]: tokenchat_core::WidgetView

mod conversation;
mod input;
mod modal;
mod status;

pub use conversation::{Conversation, ConversationState};
pub use input::InputBox;
pub use modal::{modal_bounds, ModalView};
pub use status::StatusLine;
