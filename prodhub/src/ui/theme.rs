//! Colors and styles shared by the panels.

use ratatui::style::{Color, Modifier, Style};

/// Body text.
pub const FG_PRIMARY: Color = Color::White;

/// Hints and placeholders.
pub const FG_SECONDARY: Color = Color::Gray;

/// Focus accent.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success / enabled indicator color.
pub const SUCCESS: Color = Color::Green;

/// Warning color (notices).
pub const WARNING: Color = Color::Yellow;

/// Error color (calculator error, ringing overlay).
pub const ERROR: Color = Color::Red;

/// Disabled indicator color.
pub const DISABLED: Color = Color::DarkGray;

/// Panel title color for the to-do panel.
pub const TODO_TITLE: Color = Color::Green;

/// Panel title color for the alarm panel.
pub const ALARM_TITLE: Color = Color::Yellow;

/// Panel title color for the calculator panel.
pub const CALC_TITLE: Color = Color::Cyan;

/// Calculator operator button color.
pub const CALC_OPERATOR: Color = Color::Blue;

/// Calculator equals button color.
pub const CALC_EQUALS: Color = Color::Green;

/// Calculator clear button color.
pub const CALC_CLEAR: Color = Color::Red;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (placeholders, hints).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Focused border or highlighted button frame.
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected list row or grid button.
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Completed task text (dim, struck through).
#[must_use]
pub fn completed() -> Style {
    dimmed().add_modifier(Modifier::CROSSED_OUT)
}

/// Border style for a panel, depending on focus.
#[must_use]
pub fn border(focused: bool) -> Style {
    if focused { highlighted() } else { normal() }
}

/// Status bar strip.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Bold title in `color`.
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Large-text style for the live clock and calculator display.
#[must_use]
pub fn readout() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(20, 20, 30))
        .add_modifier(Modifier::BOLD)
}

/// Ringing overlay style (bold white on red).
#[must_use]
pub fn ringing() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(150, 20, 20))
        .add_modifier(Modifier::BOLD)
}
