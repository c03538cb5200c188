//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - WidgetClient for chat behavior
//! - DisplayState for rendering
//! - Modals standing in for the browser's alert and prompt dialogs
//!
//! The App:
//! 1. Converts terminal events to SurfaceEvents
//! 2. Sends events to the embedded widget via WidgetClient
//! 3. Receives WidgetMessages and updates DisplayState
//! 4. Renders based on DisplayState

use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{StatefulWidget, Widget};
use ratatui::Terminal;
use tokio::time::MissedTickBehavior;

use tokenchat_core::{ChatApi, CompletionKind};

use crate::compositor::{Blend, Compositor, LayerId};
use crate::display::DisplayState;
use crate::modal::{Modal, ModalOutcome};
use crate::widget_client::WidgetClient;
use crate::widgets::{
    modal_bounds, Conversation, ConversationState, InputBox, ModalView, StatusLine,
};

/// Input area height, separator included
const INPUT_HEIGHT: u16 = 4;

/// Lines per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// Frame pacing
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Layer IDs for UI regions
struct AppLayers {
    conversation: LayerId,
    input: LayerId,
    status: LayerId,
    modal: LayerId,
}

/// Screen regions for a terminal size
struct Regions {
    conversation: Rect,
    input: Rect,
    status: Rect,
}

impl Regions {
    fn for_area(area: Rect) -> Self {
        let bottom = INPUT_HEIGHT + 1;
        let conversation_height = area.height.saturating_sub(bottom);
        Self {
            conversation: Rect::new(0, 0, area.width, conversation_height),
            input: Rect::new(
                0,
                conversation_height,
                area.width,
                INPUT_HEIGHT.min(area.height.saturating_sub(1)),
            ),
            status: Rect::new(0, area.height.saturating_sub(1), area.width, 1_u16.min(area.height)),
        }
    }
}

/// Main application state
pub struct App<A: ChatApi> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Widget Integration ===
    /// Client for the embedded chat widget
    client: WidgetClient<A>,
    /// Display state derived from WidgetMessages
    display: DisplayState,
    /// Open alert or prompt
    modal: Option<Modal>,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,
    /// Conversation scroll state
    conversation: ConversationState,
    /// Message list version last rendered; a change snaps to the bottom
    seen_messages_version: u64,
}

impl<A: ChatApi + 'static> App<A> {
    /// Create an app for a terminal of `size` (columns, rows)
    pub fn new(client: WidgetClient<A>, size: (u16, u16)) -> Self {
        let area = Rect::new(0, 0, size.0, size.1);
        let regions = Regions::for_area(area);

        let mut compositor = Compositor::new(area);
        let layers = AppLayers {
            conversation: compositor.create_layer(regions.conversation, 0),
            input: compositor.create_layer(regions.input, 10),
            status: compositor.create_layer(regions.status, 10),
            modal: compositor.create_layer(Rect::new(0, 0, 0, 0), 100),
        };
        compositor.set_blend(layers.modal, Blend::Opaque);
        compositor.set_visible(layers.modal, false);

        let display = DisplayState::new(client.widget().store().tokens());

        Self {
            running: true,
            client,
            display,
            modal: None,
            compositor,
            layers,
            conversation: ConversationState::default(),
            seen_messages_version: 0,
        }
    }

    /// Mount the widget, which starts the history load
    ///
    /// # Errors
    ///
    /// Propagates widget event errors.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        tracing::info!("Mounting chat widget");
        self.client.mount().await?;
        self.sync();
        Ok(())
    }

    /// Main event loop
    ///
    /// # Errors
    ///
    /// Fails when the terminal cannot be drawn.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.start().await?;
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events first so typing stays responsive
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await,
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => {
                            tracing::info!("Terminal event stream closed");
                            self.running = false;
                        }
                    }
                }

                _ = frames.tick() => {}
            }

            self.tick().await;
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Apply finished requests and widget messages
    pub async fn tick(&mut self) {
        self.client.poll_completions().await;
        self.sync();
    }

    /// Wait for one request to finish, then apply it
    pub async fn await_completion(&mut self) -> Option<CompletionKind> {
        let kind = self.client.next_completion().await;
        self.sync();
        kind
    }

    /// Drain widget messages into the display and surface the next alert
    fn sync(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }

        if self.display.quit_requested {
            self.running = false;
        }

        if self.modal.is_none() {
            if let Some(message) = self.display.next_alert() {
                self.modal = Some(Modal::alert(message));
            }
        }
    }

    /// Dispatch a terminal event
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if let Some(modal) = self.modal.as_mut() {
            let outcome = modal.handle_key(key);
            self.close_modal(outcome).await;
            self.sync();
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // Quit
            KeyCode::Esc => self.quit().await,
            KeyCode::Char('c') if ctrl => self.quit().await,

            // Buy tokens
            KeyCode::Char('b') if ctrl => {
                self.modal = Some(Modal::purchase());
            }

            // Submit message
            KeyCode::Enter => {
                if self.display.input_enabled() {
                    report(self.client.send().await);
                    self.conversation.scroll_to_bottom();
                }
            }

            // Typing
            KeyCode::Char(c) if !ctrl => {
                if self.display.input_enabled() {
                    self.display.draft.push(c);
                    self.draft_changed().await;
                }
            }
            KeyCode::Backspace => {
                if self.display.input_enabled() && self.display.draft.pop().is_some() {
                    self.draft_changed().await;
                }
            }

            // Conversation scrolling
            KeyCode::PageUp => {
                let page = self.conversation.page();
                self.conversation.scroll_up(page);
            }
            KeyCode::PageDown => {
                let page = self.conversation.page();
                self.conversation.scroll_down(page);
            }
            KeyCode::Home if ctrl => self.conversation.scroll_to_top(),
            KeyCode::End if ctrl => self.conversation.scroll_to_bottom(),

            _ => {}
        }

        self.sync();
    }

    async fn close_modal(&mut self, outcome: ModalOutcome) {
        match outcome {
            ModalOutcome::Open => {}
            ModalOutcome::Dismissed => {
                self.modal = None;
            }
            ModalOutcome::Confirmed(answer) => {
                self.modal = None;
                report(self.client.answer_purchase(Some(answer)).await);
            }
            ModalOutcome::Cancelled => {
                self.modal = None;
                report(self.client.answer_purchase(None).await);
            }
        }
    }

    async fn draft_changed(&mut self) {
        let text = self.display.draft.clone();
        report(self.client.draft_changed(text).await);
    }

    async fn quit(&mut self) {
        report(self.client.request_quit().await);
        self.running = false;
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.conversation.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown => self.conversation.scroll_down(WHEEL_LINES),
            _ => {}
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        self.compositor.resize(area);

        let regions = Regions::for_area(area);
        self.compositor
            .set_bounds(self.layers.conversation, regions.conversation);
        self.compositor.set_bounds(self.layers.input, regions.input);
        self.compositor.set_bounds(self.layers.status, regions.status);
    }

    /// Render every layer and composite the frame
    pub fn draw(&mut self) -> &Buffer {
        let view = self.display.view();

        if self.display.messages_version != self.seen_messages_version {
            self.seen_messages_version = self.display.messages_version;
            self.conversation.scroll_to_bottom();
        }

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.conversation) {
            buf.reset();
            let area = buf.area;
            Conversation::new(&view.rows).render(area, buf, &mut self.conversation);
        }

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.input) {
            buf.reset();
            let area = buf.area;
            InputBox::new(&view).render(area, buf);
        }

        let scroll_offset = self.conversation.scroll_offset;
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            buf.reset();
            let area = buf.area;
            StatusLine::new(&view, scroll_offset).render(area, buf);
        }

        match &self.modal {
            Some(modal) => {
                let bounds = modal_bounds(self.compositor.area(), modal);
                self.compositor.set_bounds(self.layers.modal, bounds);
                self.compositor.set_visible(self.layers.modal, true);
                if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.modal) {
                    buf.reset();
                    let area = buf.area;
                    ModalView::new(modal).render(area, buf);
                }
            }
            None => self.compositor.set_visible(self.layers.modal, false),
        }

        self.compositor.composite()
    }

    /// Draw a frame to the terminal
    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            let output = self.draw();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    if let Some(cell) = output.cell((x, y)) {
                        buf[(x, y)] = cell.clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// The open modal, if any
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// Lines scrolled up from the newest message
    pub fn scroll_offset(&self) -> usize {
        self.conversation.scroll_offset
    }

    /// The widget client
    pub fn client(&self) -> &WidgetClient<A> {
        &self.client
    }
}

/// Log a failed surface event; the UI keeps running
fn report(result: anyhow::Result<()>) {
    if let Err(e) = result {
        tracing::warn!("Widget event failed: {}", e);
    }
}
