//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{AlarmFocus, App, Tab, TodoFocus};

/// Key help for the current tab and focus.
#[must_use]
pub fn help_text(app: &App) -> &'static str {
    if app.scheduler.ringing().is_some() {
        return "Enter/Space/Esc: dismiss alarm | Ctrl+Q: quit";
    }
    match app.tab {
        Tab::Todo => match app.todo_focus {
            TodoFocus::Input => "Enter: add task | ↓: list | Tab: next tab | Ctrl+Q: quit",
            TodoFocus::List => {
                "↑↓/jk: move | Space: done | d: delete | Esc: input | Tab: next tab"
            }
        },
        Tab::Alarm => match app.alarm_focus {
            AlarmFocus::Time | AlarmFocus::Name => {
                "Enter: set alarm | ↑↓: field/list | Tab: next tab | Ctrl+Q: quit"
            }
            AlarmFocus::List => {
                "↑↓/jk: move | Space: on/off | d: delete | Esc: form | Tab: next tab"
            }
        },
        Tab::Calculator => {
            "Type to enter | Enter: = | Bksp: C | Del: AC | arrows+Space: buttons | Tab: next tab"
        }
    }
}

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (dot_color, storage) = if app.persistent {
        (theme::SUCCESS, "saved")
    } else {
        (theme::WARNING, "in-memory")
    };

    let mut spans = vec![
        Span::styled("Productivity Hub", theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {storage}")),
        Span::raw(" | "),
    ];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(notice.as_str(), theme::normal().fg(theme::WARNING)));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(help_text(app), theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
