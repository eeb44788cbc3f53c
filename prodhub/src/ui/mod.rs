//! Terminal UI rendering.

pub mod alarm_panel;
pub mod calc_panel;
pub mod status_bar;
pub mod theme;
pub mod todo_panel;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};

use crate::app::{App, Tab};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Header with tabs, content, status bar at bottom.
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tabs(frame, main_chunks[0], app);

    match app.tab {
        Tab::Todo => todo_panel::render(frame, main_chunks[1], app),
        Tab::Alarm => alarm_panel::render(frame, main_chunks[1], app),
        Tab::Calculator => calc_panel::render(frame, main_chunks[1], app),
    }

    status_bar::render(frame, main_chunks[2], app);

    // The ringing overlay shows over whichever tab is active.
    if let Some(alarm) = app.scheduler.ringing() {
        alarm_panel::render_ringing(frame, frame.area(), alarm, app.scheduler.alarms().sound_failed());
    }
}

/// Render the title block and tab bar.
fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("F{} {}", i + 1, tab.title())))
        .collect();

    let block = Block::default()
        .title(Span::styled("Productivity Hub", theme::bold()))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    let tabs = Tabs::new(titles)
        .block(block)
        .select(app.tab.index())
        .style(theme::dimmed())
        .highlight_style(theme::selected())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

/// A rectangle of at most `width` × `height` centered in `area`.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
