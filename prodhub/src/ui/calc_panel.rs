//! Calculator panel rendering (display + button grid).

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use prodhub_core::calc::{Key, Operator};

use super::theme;
use crate::app::{App, CALC_GRID, CalcButton};

/// Render the calculator tab.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let area = super::centered(area, 56, area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_display(frame, chunks[0], app);
    render_grid(frame, chunks[1], app);
}

fn render_display(frame: &mut Frame, area: Rect, app: &App) {
    let style = if app.calculator.is_error() {
        theme::readout().fg(theme::ERROR)
    } else {
        theme::readout()
    };
    let block = Block::default()
        .title(Span::styled(
            "Scientific Calculator",
            theme::panel_title(theme::CALC_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::normal());
    let display = Paragraph::new(Line::from(Span::styled(app.calculator.display(), style)))
        .alignment(Alignment::Right)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(display, area);
}

fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(CALC_GRID.map(|_| Constraint::Length(3)))
        .split(area);

    for (r, (row, row_area)) in CALC_GRID.iter().zip(rows.iter()).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(row.map(|_| Constraint::Ratio(1, 5)))
            .split(*row_area);
        for (c, (btn, cell)) in row.iter().zip(cells.iter()).enumerate() {
            let highlighted = app.calc_cursor == (r, c);
            render_button(frame, *cell, btn, highlighted);
        }
    }
}

fn render_button(frame: &mut Frame, area: Rect, btn: &CalcButton, highlighted: bool) {
    let face = if highlighted {
        theme::selected()
    } else {
        button_style(btn.key)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if highlighted {
            theme::highlighted()
        } else {
            theme::dimmed()
        });
    let line = Line::from(vec![
        Span::styled(btn.label, face),
        Span::styled(format!(" {}", btn.shortcut), theme::dimmed()),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn button_style(key: Key) -> Style {
    match key {
        Key::Operator(Operator::Add | Operator::Sub | Operator::Mul | Operator::Div) => {
            theme::panel_title(theme::CALC_OPERATOR)
        }
        Key::Equals => theme::panel_title(theme::CALC_EQUALS),
        Key::ClearAll => theme::panel_title(theme::CALC_CLEAR),
        _ => theme::bold(),
    }
}
