//! Alarm panel rendering (live clock, new-alarm form, alarm list) and
//! the ringing overlay.

use std::fmt::Write;

use chrono::NaiveDateTime;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use prodhub_core::model::Alarm;

use super::theme;
use super::todo_panel::input_line;
use crate::app::{AlarmFocus, App};

/// Render the alarm tab.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    render_clock(frame, left[0], app);
    render_field(frame, left[1], app, AlarmFocus::Time);
    render_field(frame, left[2], app, AlarmFocus::Name);
    render_alarms(frame, columns[1], app);
}

fn render_clock(frame: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(Span::styled(
            format_now(app.now, &app.clock_format),
            theme::readout(),
        )),
        Line::from(Span::styled(
            format_now(app.now, &app.date_format),
            theme::dimmed(),
        )),
    ];
    let block = Block::default()
        .title(Span::styled(
            "Alarm Clock",
            theme::panel_title(theme::ALARM_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::normal());
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Format `now` with a user-supplied chrono pattern. An invalid pattern
/// renders as `??`.
fn format_now(now: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(pattern)).is_err() {
        return "??".to_string();
    }
    out
}

fn render_field(frame: &mut Frame, area: Rect, app: &App, field: AlarmFocus) {
    let focused = app.alarm_focus == field;
    let (title, input, placeholder) = match field {
        AlarmFocus::Time => ("Time (HH:MM)", &app.alarm_time, "07:30"),
        _ => ("Name (optional)", &app.alarm_name, "Alarm name"),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::border(focused));
    frame.render_widget(
        Paragraph::new(input_line(input, focused, placeholder)).block(block),
        area,
    );
}

fn render_alarms(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.alarm_focus == AlarmFocus::List;
    let alarms = app.scheduler.alarms().book().alarms();

    let block = Block::default()
        .title(format!("Alarms ({})", alarms.len()))
        .borders(Borders::ALL)
        .border_style(theme::border(focused));

    if alarms.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No alarms set.",
            theme::dimmed(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = alarms
        .iter()
        .map(|alarm| {
            let (switch, style) = if alarm.enabled {
                ("● on ", theme::normal().fg(theme::SUCCESS))
            } else {
                ("○ off", theme::normal().fg(theme::DISABLED))
            };
            let text_style = if alarm.enabled {
                theme::bold()
            } else {
                theme::dimmed()
            };
            ListItem::new(Line::from(vec![
                Span::styled(switch, style),
                Span::raw("  "),
                Span::styled(alarm.time.as_str(), text_style),
                Span::raw("  "),
                Span::styled(alarm.name.as_str(), text_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            theme::selected()
        } else {
            theme::normal()
        });

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.alarm_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the modal "alarm ringing" popup centered in `area`.
pub fn render_ringing(frame: &mut Frame, area: Rect, alarm: &Alarm, sound_failed: bool) {
    let popup = super::centered(area, 40, 9);
    let mut lines = vec![
        Line::from(Span::styled("⏰ ALARM", theme::ringing())),
        Line::from(""),
        Line::from(Span::styled(alarm.name.as_str(), theme::ringing())),
        Line::from(Span::styled(alarm.time.as_str(), theme::ringing())),
        Line::from(""),
        Line::from(Span::styled("[ Dismiss: Enter ]", theme::ringing())),
    ];
    if sound_failed {
        lines.insert(
            4,
            Line::from(Span::styled("(sound unavailable)", theme::ringing())),
        );
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::ringing())
        .style(theme::ringing());

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        popup,
    );
}
