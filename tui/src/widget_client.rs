//! Widget Client
//!
//! Thin wrapper around the chat widget for TUI integration.
//! The widget is embedded directly; this client turns user actions into
//! [`SurfaceEvent`]s and hands back the [`WidgetMessage`]s it produces.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any chat logic. Its job is:
//! 1. Convert terminal input to `SurfaceEvent`s
//! 2. Send them to the widget
//! 3. Receive `WidgetMessage`s
//! 4. Render display state based on those messages

use tokio::sync::mpsc;

use tokenchat_core::{
    ChatApi, ChatWidget, CompletionKind, HttpChatApi, SurfaceEvent, WidgetConfig, WidgetMessage,
};

/// Capacity of the widget -> TUI channel
const MESSAGE_CHANNEL_SIZE: usize = 100;

/// Client for driving an embedded [`ChatWidget`]
pub struct WidgetClient<A: ChatApi> {
    widget: ChatWidget<A>,
    rx: mpsc::Receiver<WidgetMessage>,
}

impl WidgetClient<HttpChatApi> {
    /// Create a client talking to the configured server
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built from `config`.
    pub fn from_config(config: WidgetConfig) -> anyhow::Result<Self> {
        let api = HttpChatApi::from_config(&config)?;
        Ok(Self::new(api, config))
    }
}

impl<A: ChatApi + 'static> WidgetClient<A> {
    /// Create a client around any chat backend
    pub fn new(api: A, config: WidgetConfig) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_CHANNEL_SIZE);
        let widget = ChatWidget::new(api, config, tx);
        Self { widget, rx }
    }

    /// Report that the chat is on screen
    ///
    /// # Errors
    ///
    /// Propagates widget event errors.
    pub async fn mount(&mut self) -> anyhow::Result<()> {
        self.widget.handle_event(SurfaceEvent::Mounted).await
    }

    /// Report the full input text after an edit
    ///
    /// # Errors
    ///
    /// Propagates widget event errors.
    pub async fn draft_changed(&mut self, text: String) -> anyhow::Result<()> {
        self.widget
            .handle_event(SurfaceEvent::DraftChanged { text })
            .await
    }

    /// Press send
    ///
    /// # Errors
    ///
    /// Propagates widget event errors.
    pub async fn send(&mut self) -> anyhow::Result<()> {
        self.widget.handle_event(SurfaceEvent::SendRequested).await
    }

    /// Answer the purchase prompt; `None` means it was cancelled
    ///
    /// # Errors
    ///
    /// Propagates widget event errors.
    pub async fn answer_purchase(&mut self, answer: Option<String>) -> anyhow::Result<()> {
        self.widget
            .handle_event(SurfaceEvent::PurchaseAnswered { answer })
            .await
    }

    /// Ask the widget to shut down
    ///
    /// # Errors
    ///
    /// Propagates widget event errors.
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.widget.handle_event(SurfaceEvent::QuitRequested).await
    }

    /// Apply finished network calls (must be called regularly)
    pub async fn poll_completions(&mut self) -> bool {
        self.widget.poll_completions().await
    }

    /// Wait for one network call to finish; `None` if nothing is pending
    pub async fn next_completion(&mut self) -> Option<CompletionKind> {
        self.widget.next_completion().await
    }

    /// Receive all pending messages from the widget (non-blocking)
    pub fn recv_all(&mut self) -> Vec<WidgetMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Requests still on the wire
    pub fn pending_requests(&self) -> usize {
        self.widget.pending_requests()
    }

    /// The embedded widget
    pub fn widget(&self) -> &ChatWidget<A> {
        &self.widget
    }
}
