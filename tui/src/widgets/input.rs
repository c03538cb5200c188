//! Input Box
//!
//! Separator with the send control on the right, then the draft (or the
//! placeholder) wrapped below it. The last lines stay visible while typing.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use tokenchat_core::WidgetView;

use crate::theme::{DIM_GRAY, PROMPT_YELLOW, SENDING_MAGENTA, USER_GREEN};

/// Prompt shown before the draft
const PROMPT: &str = "> ";

/// The input area
pub struct InputBox<'a> {
    view: &'a WidgetView,
}

impl<'a> InputBox<'a> {
    /// Draw `view`'s input state
    pub fn new(view: &'a WidgetView) -> Self {
        Self { view }
    }

    fn send_control(&self) -> (String, Style) {
        let label = format!("[ {} ]", self.view.send_label);
        let style = if self.view.loading {
            Style::default().fg(SENDING_MAGENTA)
        } else if self.view.input_enabled {
            Style::default().fg(USER_GREEN).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DIM_GRAY)
        };
        (label, style)
    }

    fn body(&self) -> (String, Style) {
        if self.view.shows_placeholder() {
            (
                format!("{PROMPT}{}", self.view.placeholder),
                Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC),
            )
        } else if self.view.input_enabled {
            (
                format!("{PROMPT}{}_", self.view.draft),
                Style::default().fg(USER_GREEN),
            )
        } else {
            (
                format!("{PROMPT}{}", self.view.draft),
                Style::default().fg(DIM_GRAY),
            )
        }
    }
}

impl Widget for InputBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 8 {
            return;
        }

        let separator = "-".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &separator, Style::default().fg(DIM_GRAY));

        let (label, label_style) = self.send_control();
        #[allow(clippy::cast_possible_truncation)]
        let label_width = label.width() as u16;
        if label_width + 2 <= area.width {
            let x = area.x + area.width - label_width - 1;
            buf.set_string(x, area.y, &label, label_style);
        }

        let text_height = area.height.saturating_sub(1) as usize;
        let text_width = area.width.saturating_sub(1) as usize;
        if text_height == 0 || text_width < 5 {
            return;
        }

        let (text, style) = self.body();
        let wrapped = textwrap::wrap(&text, text_width);
        let skip = wrapped.len().saturating_sub(text_height);

        for (i, line) in wrapped.iter().skip(skip).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + 1 + i as u16;
            buf.set_stringn(area.x, y, line, text_width, style);
        }

        // Marker when older lines of a long draft are hidden
        if skip > 0 {
            buf.set_string(area.x, area.y, "^", Style::default().fg(PROMPT_YELLOW));
        }
    }
}
