//! Chat Widget
//!
//! The headless widget. It owns the [`ChatStore`], reacts to
//! [`SurfaceEvent`]s, talks to the chat server through a [`ChatApi`], and
//! reports every state change to the surface as a [`WidgetMessage`].
//!
//! # Request flow
//!
//! Network calls run on spawned tasks so the surface keeps drawing while a
//! request is pending. Results come back on an internal completion channel
//! and are applied by the owner through [`ChatWidget::poll_completions`] (each
//! frame) or [`ChatWidget::next_completion`]. Only the owner mutates state.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{ApiError, ChatApi, ChatResponse, HistoryResponse, TokensResponse};
use crate::config::WidgetConfig;
use crate::events::SurfaceEvent;
use crate::messages::{ChatMessage, WidgetMessage, WidgetPhase};
use crate::prompt::purchase_amount;
use crate::store::ChatStore;
use crate::view::WidgetView;

/// Alert shown when sending with an empty balance
pub const OUT_OF_TOKENS_ALERT: &str = "Out of tokens. Please buy more.";

/// Alert shown for any network-class failure
pub const NETWORK_ERROR_ALERT: &str = "Network error";

/// Alert for a rejected chat message without an error text
pub const CHAT_ERROR_FALLBACK: &str = "Error";

/// Alert for a rejected purchase without an error text
pub const PURCHASE_ERROR_FALLBACK: &str = "Could not add tokens";

const COMPLETION_CHANNEL_SIZE: usize = 16;

/// Result of [`ChatWidget::send_message`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The draft was blank; nothing happened
    EmptyDraft,
    /// The balance is exhausted; an alert was raised
    OutOfTokens,
    /// Another send is still in flight and the single-flight guard is on
    InFlight,
    /// The message was appended at `index` and the request is in flight
    Sent {
        /// Position of the optimistic user message
        index: usize,
    },
}

/// Result of [`ChatWidget::buy_tokens`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Cancelled, unparseable, or not positive; no request made
    Aborted,
    /// The purchase request is in flight
    Requested {
        /// Amount being bought
        amount: i64,
    },
}

/// Which request a completion belonged to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    /// History load
    History,
    /// Chat message
    Chat,
    /// Token purchase
    Purchase,
}

/// A finished network call
#[derive(Debug)]
enum Completion {
    History(Result<HistoryResponse, ApiError>),
    Chat(Result<ChatResponse, ApiError>),
    Purchase(Result<TokensResponse, ApiError>),
}

impl Completion {
    fn kind(&self) -> CompletionKind {
        match self {
            Self::History(_) => CompletionKind::History,
            Self::Chat(_) => CompletionKind::Chat,
            Self::Purchase(_) => CompletionKind::Purchase,
        }
    }
}

/// The chat widget core
pub struct ChatWidget<A: ChatApi> {
    /// Configuration
    config: WidgetConfig,
    /// Chat server
    api: Arc<A>,
    /// Widget state
    store: ChatStore,
    /// Channel to the UI surface
    tx: mpsc::Sender<WidgetMessage>,
    /// Finished network calls
    completion_tx: mpsc::Sender<Completion>,
    completion_rx: mpsc::Receiver<Completion>,
    /// Requests spawned but not yet applied
    pending: usize,
    /// Chat sends spawned but not yet applied
    sends_in_flight: usize,
    /// History is requested at most once
    history_requested: bool,
}

impl<A: ChatApi + 'static> ChatWidget<A> {
    /// Create a widget; the balance starts at `config.initial_tokens`
    pub fn new(api: A, config: WidgetConfig, tx: mpsc::Sender<WidgetMessage>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(COMPLETION_CHANNEL_SIZE);
        let store = ChatStore::new(config.initial_tokens);

        Self {
            config,
            api: Arc::new(api),
            store,
            tx,
            completion_tx,
            completion_rx,
            pending: 0,
            sends_in_flight: 0,
            history_requested: false,
        }
    }

    /// Current state
    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    /// Renderable projection of the current state
    pub fn view(&self) -> WidgetView {
        self.store.view()
    }

    /// Whether a send is in flight
    pub fn is_sending(&self) -> bool {
        self.store.phase().is_loading()
    }

    /// Number of network calls not yet applied
    pub fn pending_requests(&self) -> usize {
        self.pending
    }

    /// Handle an event from the UI surface
    ///
    /// # Errors
    ///
    /// Currently infallible; the signature leaves room for surfaces that
    /// must be told about rejected events.
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::trace!(event = event.name(), "Surface event");

        match event {
            SurfaceEvent::Mounted => self.load_history(),
            SurfaceEvent::DraftChanged { text } => self.store.set_draft(text),
            SurfaceEvent::SendRequested => {
                self.send_message().await;
            }
            SurfaceEvent::PurchaseAnswered { answer } => {
                self.buy_tokens(answer.as_deref());
            }
            SurfaceEvent::QuitRequested => {
                tracing::info!("Quit requested");
                self.send(WidgetMessage::Quit).await;
            }
        }

        Ok(())
    }

    /// Request recent history, once per widget
    pub fn load_history(&mut self) {
        if self.history_requested {
            tracing::debug!("History already requested");
            return;
        }
        self.history_requested = true;

        let limit = self.config.history_limit;
        tracing::info!(limit, backend = self.api.name(), "Loading history");
        self.spawn(move |api| async move { Completion::History(api.fetch_history(limit).await) });
    }

    /// Send the current draft
    ///
    /// The user message is appended before this returns; the reply is
    /// applied later by [`poll_completions`](Self::poll_completions).
    pub async fn send_message(&mut self) -> SendOutcome {
        if self.store.draft().trim().is_empty() {
            return SendOutcome::EmptyDraft;
        }
        if self.config.single_flight && self.sends_in_flight > 0 {
            tracing::debug!("Send rejected, another send is in flight");
            return SendOutcome::InFlight;
        }
        if self.store.tokens() <= 0 {
            tracing::info!(tokens = self.store.tokens(), "Send blocked, out of tokens");
            self.alert(OUT_OF_TOKENS_ALERT).await;
            return SendOutcome::OutOfTokens;
        }

        let text = self.store.draft().to_string();
        let message = ChatMessage::user(text.clone());
        let index = self.store.append(message.clone());
        self.send(WidgetMessage::MessageAppended { index, message })
            .await;
        self.set_phase(WidgetPhase::Sending).await;

        self.sends_in_flight += 1;
        tracing::debug!(chars = text.len(), "Sending message");
        self.spawn(move |api| async move { Completion::Chat(api.send_chat(&text).await) });

        SendOutcome::Sent { index }
    }

    /// Buy tokens using the raw purchase prompt answer
    pub fn buy_tokens(&mut self, answer: Option<&str>) -> PurchaseOutcome {
        let Some(amount) = purchase_amount(answer) else {
            tracing::debug!(answer = ?answer, "Purchase aborted");
            return PurchaseOutcome::Aborted;
        };

        tracing::info!(amount, "Buying tokens");
        self.spawn(move |api| async move { Completion::Purchase(api.add_tokens(amount).await) });

        PurchaseOutcome::Requested { amount }
    }

    /// Apply every finished network call without waiting
    ///
    /// Returns true if anything was applied.
    pub async fn poll_completions(&mut self) -> bool {
        let mut completions = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            completions.push(completion);
        }

        if completions.is_empty() {
            return false;
        }

        for completion in completions {
            self.apply(completion).await;
        }
        true
    }

    /// Wait for the next finished network call and apply it
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn next_completion(&mut self) -> Option<CompletionKind> {
        if self.pending == 0 {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        let kind = completion.kind();
        self.apply(completion).await;
        Some(kind)
    }

    /// Run a network call on its own task and route the result back
    fn spawn<F, Fut>(&mut self, call: F)
    where
        F: FnOnce(Arc<A>) -> Fut,
        Fut: std::future::Future<Output = Completion> + Send + 'static,
    {
        let fut = call(Arc::clone(&self.api));
        let tx = self.completion_tx.clone();
        self.pending += 1;

        tokio::spawn(async move {
            let completion = fut.await;
            if tx.send(completion).await.is_err() {
                tracing::debug!("Widget dropped before request finished");
            }
        });
    }

    async fn apply(&mut self, completion: Completion) {
        self.pending = self.pending.saturating_sub(1);

        match completion {
            Completion::History(result) => self.apply_history(result).await,
            Completion::Chat(result) => self.apply_chat(result).await,
            Completion::Purchase(result) => self.apply_purchase(result).await,
        }
    }

    async fn apply_history(&mut self, result: Result<HistoryResponse, ApiError>) {
        match result {
            Ok(response) if response.ok => {
                let messages: Vec<ChatMessage> =
                    response.messages.into_iter().map(Into::into).collect();
                tracing::info!(count = messages.len(), "History loaded");
                self.store.prepend_history(messages.clone());
                self.send(WidgetMessage::HistoryLoaded { messages }).await;
            }
            Ok(_) => {
                tracing::warn!("History request was rejected by the server");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load history");
            }
        }
    }

    async fn apply_chat(&mut self, result: Result<ChatResponse, ApiError>) {
        self.sends_in_flight = self.sends_in_flight.saturating_sub(1);

        match result {
            Ok(response) if response.ok => {
                let reply = response.reply.unwrap_or_else(|| {
                    tracing::warn!("Chat reply missing from successful response");
                    String::new()
                });
                let message = ChatMessage::bot(reply);
                let index = self.store.append(message.clone());
                self.send(WidgetMessage::MessageAppended { index, message })
                    .await;

                match response.tokens {
                    Some(tokens) => self.set_tokens(tokens).await,
                    None => tracing::warn!("Token balance missing from chat response"),
                }
            }
            Ok(response) => {
                let error = response
                    .error
                    .unwrap_or_else(|| CHAT_ERROR_FALLBACK.to_string());
                tracing::warn!(error = %error, "Message rejected");
                self.alert(&error).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send message");
                self.alert(NETWORK_ERROR_ALERT).await;
            }
        }

        self.store.clear_draft();
        self.send(WidgetMessage::DraftCleared).await;
        if self.sends_in_flight == 0 {
            self.set_phase(WidgetPhase::Idle).await;
        }
    }

    async fn apply_purchase(&mut self, result: Result<TokensResponse, ApiError>) {
        match result {
            Ok(response) if response.ok => match response.tokens {
                Some(tokens) => {
                    tracing::info!(tokens, "Tokens purchased");
                    self.set_tokens(tokens).await;
                }
                None => tracing::warn!("Token balance missing from purchase response"),
            },
            Ok(response) => {
                let error = response
                    .error
                    .unwrap_or_else(|| PURCHASE_ERROR_FALLBACK.to_string());
                tracing::warn!(error = %error, "Purchase rejected");
                self.alert(&error).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to buy tokens");
                self.alert(NETWORK_ERROR_ALERT).await;
            }
        }
    }

    async fn set_tokens(&mut self, tokens: i64) {
        self.store.set_tokens(tokens);
        self.send(WidgetMessage::TokensChanged { tokens }).await;
    }

    async fn set_phase(&mut self, phase: WidgetPhase) {
        self.store.set_phase(phase);
        self.send(WidgetMessage::PhaseChanged { phase }).await;
    }

    async fn alert(&self, message: &str) {
        self.send(WidgetMessage::Alert {
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: WidgetMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}
