//! Tokenchat TUI - Terminal surface for the token-metered chat widget
//!
//! This crate renders a [`tokenchat_core::ChatWidget`] full-screen: the
//! conversation, an input line with a send control, the token balance, and
//! modal alerts/prompts.
//!
//! # Architecture
//!
//! - **Compositor**: Layered rendering with z-ordering so modals sit on top
//! - **Widgets**: Borderless scrollable conversation, input box, status line
//! - **Display**: State rebuilt from `WidgetMessage`s
//! - **WidgetClient**: Embedded widget; all chat behavior lives in the core

pub mod app;
pub mod compositor;
pub mod display;
pub mod modal;
pub mod theme;
pub mod widget_client;
pub mod widgets;

pub use app::App;
pub use widget_client::WidgetClient;
