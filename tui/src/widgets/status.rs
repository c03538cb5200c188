//! Status Line
//!
//! Balance, phase, scroll position and key hints on one line.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use tokenchat_core::WidgetView;

use crate::theme::{tokens_style, DIM_GRAY, SENDING_MAGENTA};

/// Key hints
const HINTS: &str = "Enter send | Ctrl+B buy | PgUp/PgDn scroll | Esc quit";

/// The status line
pub struct StatusLine<'a> {
    view: &'a WidgetView,
    scroll_offset: usize,
}

impl<'a> StatusLine<'a> {
    /// Status for `view`, noting how far the conversation is scrolled
    pub fn new(view: &'a WidgetView, scroll_offset: usize) -> Self {
        Self {
            view,
            scroll_offset,
        }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().fg(DIM_GRAY);
        let (phase, phase_style) = if self.view.loading {
            ("Sending...", Style::default().fg(SENDING_MAGENTA))
        } else {
            ("Ready", dim)
        };

        let mut spans = vec![
            Span::styled(format!(" Tokens: {}", self.view.tokens), tokens_style(self.view.tokens)),
            Span::styled(" | ", dim),
            Span::styled(phase, phase_style),
        ];
        if self.scroll_offset > 0 {
            spans.push(Span::styled(
                format!(" [^{} lines - Ctrl+End for latest]", self.scroll_offset),
                dim,
            ));
        }
        spans.push(Span::styled(format!(" | {HINTS}"), dim));

        Line::from(spans).render(area, buf);
    }
}
