//! Tokenchat Core - Headless Chat Widget
//!
//! This crate holds everything the chat widget does apart from drawing: the
//! state store, history loading, sending with optimistic append, token
//! purchases, the view projection, and the HTTP client for the chat server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      UI Surface (TUI)                     │
//! │         key presses                draw WidgetView        │
//! └───────────────┬─────────────────────────▲────────────────┘
//!                 │ SurfaceEvent            │ WidgetMessage
//! ┌───────────────▼─────────────────────────┴────────────────┐
//! │                        ChatWidget                         │
//! │   ┌───────────┐   ┌──────────────┐   ┌────────────────┐   │
//! │   │ ChatStore │   │  WidgetView  │   │ completion rx  │   │
//! │   └───────────┘   └──────────────┘   └───────▲────────┘   │
//! └───────────────────────────────────────────────┼──────────┘
//!                                 spawned request │
//! ┌───────────────────────────────────────────────┴──────────┐
//! │   ChatApi (HttpChatApi + CredentialProvider)              │
//! │   GET /api/messages/   POST /api/chat/   POST /api/tokens/add/
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use tokenchat_core::{load_config, ChatWidget, HttpChatApi, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let api = HttpChatApi::from_config(&config)?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut widget = ChatWidget::new(api, config, tx);
//!
//!     widget.handle_event(SurfaceEvent::Mounted).await?;
//!
//!     loop {
//!         widget.poll_completions().await;
//!         while let Ok(msg) = rx.try_recv() {
//!             // Apply to the display state
//!         }
//!         // Read input, forward as SurfaceEvent
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`api`]: Chat server trait and HTTP implementation
//! - [`config`]: Layered configuration (CLI, env, TOML, defaults)
//! - [`credentials`]: CSRF token and cookie providers
//! - [`events`]: Events from the surface to the widget
//! - [`messages`]: Messages from the widget to the surface
//! - [`prompt`]: Purchase prompt text and amount parsing
//! - [`store`]: Widget state
//! - [`view`]: Pure view projection
//! - [`widget`]: The [`ChatWidget`] itself
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod credentials;
pub mod events;
pub mod messages;
pub mod prompt;
pub mod store;
pub mod view;
pub mod widget;

pub use api::{ApiError, ChatApi, ChatResponse, HistoryResponse, HttpChatApi, TokensResponse};
pub use credentials::{CookieCredentials, CredentialProvider, NoCredentials, StaticCredentials};
pub use events::SurfaceEvent;
pub use messages::{ChatMessage, Role, WidgetMessage, WidgetPhase};
pub use prompt::{parse_amount, DEFAULT_PURCHASE_AMOUNT, PURCHASE_PROMPT};
pub use store::ChatStore;
pub use view::{accepts_input, MessageRow, WidgetView};
pub use widget::{ChatWidget, CompletionKind, PurchaseOutcome, SendOutcome};

// Config exports
pub use config::{
    default_config_path, default_log_path, load_config, load_config_from_path, ConfigError,
    ConfigOverrides, ConfigSource, TokenchatToml, WidgetConfig,
};
