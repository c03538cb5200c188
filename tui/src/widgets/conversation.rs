//! Conversation Widget
//!
//! A borderless, scrollable message list. Scrolling is measured in lines
//! from the bottom so that new messages stay in view at offset 0.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;

use tokenchat_core::MessageRow;

use crate::theme::{role_prefix, role_style, FADE_FAR, FADE_NEAR};

/// Scroll state for the conversation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Lines scrolled up from the bottom (0 = latest)
    pub scroll_offset: usize,
    /// Total wrapped lines at the last render
    pub total_lines: usize,
    /// Visible height at the last render
    pub viewport: usize,
}

impl ConversationState {
    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        let max = self.max_offset();
        self.scroll_offset = (self.scroll_offset + lines).min(max);
    }

    /// Scroll towards newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump to the newest message
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Jump to the oldest message
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = self.max_offset();
    }

    /// Half a viewport, at least one line
    pub fn page(&self) -> usize {
        (self.viewport / 2).max(1)
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }
}

/// The message list
pub struct Conversation<'a> {
    rows: &'a [MessageRow],
}

impl<'a> Conversation<'a> {
    /// Render `rows`
    pub fn new(rows: &'a [MessageRow]) -> Self {
        Self { rows }
    }

    /// Wrap every row to `width`, with a blank line after each message
    fn lines(&self, width: usize) -> Vec<(String, Style)> {
        let mut lines = Vec::new();
        for row in self.rows {
            let style = role_style(row.role);
            let content = format!("{}{}", role_prefix(row.role), row.content);
            for line in textwrap::wrap(&content, width) {
                lines.push((line.into_owned(), style));
            }
            lines.push((String::new(), Style::default()));
        }
        lines
    }
}

impl StatefulWidget for Conversation<'_> {
    type State = ConversationState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let width = area.width.saturating_sub(2) as usize;
        let height = area.height as usize;
        if width < 10 || height == 0 {
            return;
        }

        let lines = self.lines(width);
        state.total_lines = lines.len();
        state.viewport = height;
        state.scroll_offset = state.scroll_offset.min(state.max_offset());

        let visible_end = state.total_lines.saturating_sub(state.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);
        let has_content_above = visible_start > 0;
        let has_content_below = state.scroll_offset > 0;

        for (i, (line, style)) in lines[visible_start..visible_end].iter().enumerate() {
            // Fade the two edge lines that have more content beyond them
            let from_bottom = height.saturating_sub(1).saturating_sub(i);
            let style = if has_content_above && i < 2 {
                Style::default().fg(if i == 0 { FADE_FAR } else { FADE_NEAR })
            } else if has_content_below && from_bottom < 2 {
                Style::default().fg(if from_bottom == 0 { FADE_FAR } else { FADE_NEAR })
            } else {
                *style
            };

            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, line, area.width as usize, style);
        }
    }
}
