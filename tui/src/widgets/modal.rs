//! Modal Renderer
//!
//! Draws an alert or the purchase prompt as a bordered box. The box is sized
//! to its text and centered over the chat.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::modal::Modal;
use crate::theme::{ALERT_RED, DIM_GRAY, PROMPT_YELLOW};

const MIN_WIDTH: u16 = 30;
const MAX_WIDTH: u16 = 60;

/// Screen rectangle for `modal` inside `area`
pub fn modal_bounds(area: Rect, modal: &Modal) -> Rect {
    let text_len = match modal {
        Modal::Alert { message } => message.chars().count(),
        Modal::Prompt { question, input } => question.chars().count().max(input.len() + 4),
    };

    let wanted = u16::try_from(text_len).unwrap_or(u16::MAX).saturating_add(4);
    let width = wanted.clamp(MIN_WIDTH, MAX_WIDTH).min(area.width);

    // Border, text (maybe wrapped), spacer, answer/hint
    let inner = usize::from(width.saturating_sub(4).max(1));
    let text_lines = u16::try_from(text_len.div_ceil(inner).max(1)).unwrap_or(u16::MAX);
    let height = text_lines.saturating_add(5).min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// A modal box
pub struct ModalView<'a> {
    modal: &'a Modal,
}

impl<'a> ModalView<'a> {
    /// Draw `modal`
    pub fn new(modal: &'a Modal) -> Self {
        Self { modal }
    }
}

impl Widget for ModalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let accent = match self.modal {
            Modal::Alert { .. } => ALERT_RED,
            Modal::Prompt { .. } => PROMPT_YELLOW,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(self.modal.title())
            .title_bottom(Line::styled(self.modal.hint(), Style::default().fg(DIM_GRAY)));

        let mut lines = Vec::new();
        match self.modal {
            Modal::Alert { message } => {
                lines.push(Line::from(message.as_str()));
            }
            Modal::Prompt { question, input } => {
                lines.push(Line::from(question.as_str()));
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::styled("> ", Style::default().fg(accent)),
                    Span::styled(
                        format!("{input}_"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]));
            }
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
