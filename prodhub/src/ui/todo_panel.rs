//! To-do panel rendering (input box + task list).

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::theme;
use crate::app::{App, TextInput, TodoFocus};

/// Render the to-do tab.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_input(frame, chunks[0], app);
    render_tasks(frame, chunks[1], app);
}

/// Render a text input with a block cursor when focused.
pub(super) fn input_line<'a>(input: &'a TextInput, focused: bool, placeholder: &'a str) -> Line<'a> {
    if input.value().is_empty() && !focused {
        return Line::from(Span::styled(placeholder, theme::dimmed()));
    }
    let mut text = input.value().to_string();
    if focused {
        let at = text
            .char_indices()
            .nth(input.cursor())
            .map_or(text.len(), |(i, _)| i);
        text.insert(at, '█');
    }
    Line::from(Span::styled(text, theme::normal()))
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.todo_focus == TodoFocus::Input;
    let block = Block::default()
        .title("New task")
        .borders(Borders::ALL)
        .border_style(theme::border(focused));
    let line = input_line(&app.todo_input, focused, "Add a new task...");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tasks(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.todo_focus == TodoFocus::List;
    let tasks = app.todos.tasks();
    let done = tasks.iter().filter(|t| t.completed).count();

    let block = Block::default()
        .title(Span::styled(
            format!("To-Do List ({done}/{})", tasks.len()),
            theme::panel_title(theme::TODO_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::border(focused));

    if tasks.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "Your to-do list is empty. Add a task to get started!",
            theme::dimmed(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let (checkbox, style) = if task.completed {
                ("[✓]", theme::completed())
            } else {
                ("[ ]", theme::normal())
            };
            ListItem::new(Line::from(vec![
                Span::styled(checkbox, style),
                Span::raw(" "),
                Span::styled(task.text.as_str(), style),
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
        state.select(Some(app.todo_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
