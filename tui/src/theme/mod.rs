//! Theme and Colors
//!
//! One palette for the chat surface. Roles get distinct hues so a glance at
//! the conversation shows who said what.

use ratatui::style::{Color, Modifier, Style};

use tokenchat_core::Role;

// ============================================================================
// Conversation
// ============================================================================

/// User messages
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// Bot replies
pub const BOT_CYAN: Color = Color::Rgb(120, 200, 255);

/// Fade applied to lines at the edge of a scrolled view
pub const FADE_FAR: Color = Color::Rgb(80, 80, 80);

/// Fade one line further in
pub const FADE_NEAR: Color = Color::Rgb(120, 120, 120);

// ============================================================================
// Chrome
// ============================================================================

/// Separators, placeholders, disabled text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Token balance while positive
pub const TOKENS_GOLD: Color = Color::Rgb(255, 215, 100);

/// Empty balance and alerts
pub const ALERT_RED: Color = Color::Rgb(255, 90, 90);

/// Purchase prompt accent
pub const PROMPT_YELLOW: Color = Color::Yellow;

/// In-flight indicator
pub const SENDING_MAGENTA: Color = Color::Magenta;

/// Style for a message of `role`
#[must_use]
pub fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(USER_GREEN),
        Role::Bot => Style::default().fg(BOT_CYAN),
    }
}

/// Prefix shown before a message of `role`
#[must_use]
pub fn role_prefix(role: Role) -> &'static str {
    match role {
        Role::User => "You: ",
        Role::Bot => "Bot: ",
    }
}

/// Style for the balance readout
#[must_use]
pub fn tokens_style(tokens: i64) -> Style {
    if tokens > 0 {
        Style::default().fg(TOKENS_GOLD)
    } else {
        Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD)
    }
}
