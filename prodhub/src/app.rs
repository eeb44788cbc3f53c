//! Application state and event handling.

use std::sync::Arc;

use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prodhub_core::alarm::{AlarmBook, AlarmClock, Sound, TickOutcome};
use prodhub_core::calc::{Calculator, Constant, Func, Key, Operator};
use prodhub_core::store::KvStore;
use prodhub_core::todo::TodoList;

use crate::config::HubConfig;
use crate::scheduler::{AlarmScheduler, Clock, PollOutcome};

/// The three widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// To-do list (default).
    Todo,
    /// Alarm clock.
    Alarm,
    /// Scientific calculator.
    Calculator,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::Alarm, Self::Calculator];

    /// Tab bar label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To-Do List",
            Self::Alarm => "Alarm Clock",
            Self::Calculator => "Calculator",
        }
    }

    /// Position in [`Tab::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::Alarm => 1,
            Self::Calculator => 2,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Todo => Self::Alarm,
            Self::Alarm => Self::Calculator,
            Self::Calculator => Self::Todo,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Todo => Self::Calculator,
            Self::Alarm => Self::Todo,
            Self::Calculator => Self::Alarm,
        }
    }
}

/// Focus within the to-do tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoFocus {
    /// New-task input box (default).
    Input,
    /// Task list.
    List,
}

/// Focus within the alarm tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmFocus {
    /// Time field of the new-alarm form (default).
    Time,
    /// Name field of the new-alarm form.
    Name,
    /// Alarm list.
    List,
}

/// Single-line text input with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    /// An input pre-filled with `value`, cursor at the end.
    #[must_use]
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    /// Current text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Empty the input.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Apply an editing key. Returns `false` if the key is not an
    /// editing key.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }
}

/// One calculator button.
#[derive(Debug, Clone, Copy)]
pub struct CalcButton {
    /// Face label.
    pub label: &'static str,
    /// Key it sends.
    pub key: Key,
    /// Keyboard shortcut shown under the label.
    pub shortcut: &'static str,
}

const fn button(label: &'static str, key: Key, shortcut: &'static str) -> CalcButton {
    CalcButton {
        label,
        key,
        shortcut,
    }
}

/// Calculator button grid, five buttons per row.
pub const CALC_GRID: [[CalcButton; 5]; 6] = [
    [
        button("sin", Key::Function(Func::Sin), "s"),
        button("cos", Key::Function(Func::Cos), "c"),
        button("tan", Key::Function(Func::Tan), "t"),
        button("AC", Key::ClearAll, "Del"),
        button("C", Key::Delete, "Bksp"),
    ],
    [
        button("log", Key::Function(Func::Log), "l"),
        button("ln", Key::Function(Func::Ln), "n"),
        button("xʸ", Key::Operator(Operator::Pow), "^"),
        button("√", Key::Function(Func::Sqrt), "r"),
        button("÷", Key::Operator(Operator::Div), "/"),
    ],
    [
        button("7", Key::Digit(7), "7"),
        button("8", Key::Digit(8), "8"),
        button("9", Key::Digit(9), "9"),
        button("π", Key::Constant(Constant::Pi), "p"),
        button("×", Key::Operator(Operator::Mul), "*"),
    ],
    [
        button("4", Key::Digit(4), "4"),
        button("5", Key::Digit(5), "5"),
        button("6", Key::Digit(6), "6"),
        button("e", Key::Constant(Constant::E), "e"),
        button("−", Key::Operator(Operator::Sub), "-"),
    ],
    [
        button("1", Key::Digit(1), "1"),
        button("2", Key::Digit(2), "2"),
        button("3", Key::Digit(3), "3"),
        button("!", Key::Operator(Operator::Factorial), "!"),
        button("+", Key::Operator(Operator::Add), "+"),
    ],
    [
        button("(", Key::Operator(Operator::Open), "("),
        button("0", Key::Digit(0), "0"),
        button(")", Key::Operator(Operator::Close), ")"),
        button(".", Key::Point, "."),
        button("=", Key::Equals, "Enter"),
    ],
];

/// Map a keyboard key to a calculator key.
#[must_use]
pub fn calc_key_for(key: KeyEvent) -> Option<Key> {
    let key = match key.code {
        KeyCode::Char(c @ '0'..='9') => Key::Digit(u8::try_from(c).ok()? - b'0'),
        KeyCode::Char('.' | ',') => Key::Point,
        KeyCode::Char('+') => Key::Operator(Operator::Add),
        KeyCode::Char('-') => Key::Operator(Operator::Sub),
        KeyCode::Char('*' | 'x') => Key::Operator(Operator::Mul),
        KeyCode::Char('/') => Key::Operator(Operator::Div),
        KeyCode::Char('%') => Key::Operator(Operator::Rem),
        KeyCode::Char('^') => Key::Operator(Operator::Pow),
        KeyCode::Char('(') => Key::Operator(Operator::Open),
        KeyCode::Char(')') => Key::Operator(Operator::Close),
        KeyCode::Char('!') => Key::Operator(Operator::Factorial),
        KeyCode::Char('s') => Key::Function(Func::Sin),
        KeyCode::Char('c') => Key::Function(Func::Cos),
        KeyCode::Char('t') => Key::Function(Func::Tan),
        KeyCode::Char('l') => Key::Function(Func::Log),
        KeyCode::Char('n') => Key::Function(Func::Ln),
        KeyCode::Char('r') => Key::Function(Func::Sqrt),
        KeyCode::Char('p') => Key::Constant(Constant::Pi),
        KeyCode::Char('e') => Key::Constant(Constant::E),
        KeyCode::Enter | KeyCode::Char('=') => Key::Equals,
        KeyCode::Backspace => Key::Delete,
        KeyCode::Delete | KeyCode::Esc => Key::ClearAll,
        _ => return None,
    };
    Some(key)
}

/// Main application state.
pub struct App {
    /// Active tab.
    pub tab: Tab,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// One-line message for the status bar, cleared on the next key.
    pub notice: Option<String>,
    /// Whether tasks and alarms are saved to disk.
    pub persistent: bool,

    /// To-do list.
    pub todos: TodoList,
    /// New-task input.
    pub todo_input: TextInput,
    /// Focus within the to-do tab.
    pub todo_focus: TodoFocus,
    /// Selected task index.
    pub todo_selected: usize,

    /// Alarm list, ringing state and ticker.
    pub scheduler: AlarmScheduler,
    /// Time field of the new-alarm form.
    pub alarm_time: TextInput,
    /// Name field of the new-alarm form.
    pub alarm_name: TextInput,
    /// Focus within the alarm tab.
    pub alarm_focus: AlarmFocus,
    /// Selected alarm index.
    pub alarm_selected: usize,
    /// Wall-clock time as of the last tick.
    pub now: NaiveDateTime,
    /// Live clock format (chrono).
    pub clock_format: String,
    /// Date line format (chrono).
    pub date_format: String,

    /// Calculator state.
    pub calculator: Calculator,
    /// Highlighted button in [`CALC_GRID`] as `(row, column)`.
    pub calc_cursor: (usize, usize),
}

impl App {
    /// Build the app over `store`, with alarms sounded by `alarms` and
    /// times read from `clock`.
    #[must_use]
    pub fn new(
        store: &Arc<dyn KvStore>,
        alarms: AlarmClock,
        clock: Box<dyn Clock>,
        config: &HubConfig,
    ) -> Self {
        let todos = TodoList::load(Arc::clone(store));
        let scheduler = AlarmScheduler::new(alarms, clock);
        let now = scheduler.now();
        Self {
            tab: Tab::Todo,
            should_quit: false,
            notice: None,
            persistent: true,
            todos,
            todo_input: TextInput::default(),
            todo_focus: TodoFocus::Input,
            todo_selected: 0,
            scheduler,
            alarm_time: TextInput::with_value(&config.default_time),
            alarm_name: TextInput::default(),
            alarm_focus: AlarmFocus::Time,
            alarm_selected: 0,
            now,
            clock_format: config.clock_format.clone(),
            date_format: config.date_format.clone(),
            calculator: Calculator::new(),
            calc_cursor: (0, 0),
        }
    }

    /// Build the app with alarms loaded from `store` and sounded by
    /// `sound`.
    #[must_use]
    pub fn with_store(
        store: &Arc<dyn KvStore>,
        sound: Box<dyn Sound + Send>,
        clock: Box<dyn Clock>,
        config: &HubConfig,
    ) -> Self {
        let alarms = AlarmClock::new(AlarmBook::load(Arc::clone(store)), sound);
        Self::new(store, alarms, clock, config)
    }

    /// Record whether the store is durable (shown in the status bar).
    #[must_use]
    pub fn with_persistence(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Process pending scheduler ticks: refresh the clock and pick up a
    /// newly ringing alarm.
    pub fn on_tick(&mut self) -> PollOutcome {
        let outcome = self.scheduler.poll();
        if outcome.ticks > 0 {
            self.refresh_clock();
        }
        self.note_started(&outcome);
        outcome
    }

    /// Run a single alarm tick immediately.
    pub fn tick_once(&mut self) {
        self.refresh_clock();
        let outcome = self.scheduler.tick_now();
        if let TickOutcome::Started(alarm) = outcome {
            self.note_started(&PollOutcome {
                ticks: 1,
                started: Some(alarm),
            });
        }
    }

    fn refresh_clock(&mut self) {
        self.now = self.scheduler.now();
    }

    fn note_started(&mut self, outcome: &PollOutcome) {
        if outcome.started.is_some() && self.scheduler.alarms().sound_failed() {
            self.notice = Some("Alarm sound could not start".to_string());
        }
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'q'))
        {
            self.should_quit = true;
            return;
        }

        // The ringing overlay is modal.
        if self.scheduler.ringing().is_some() {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ' | 'd')
            ) {
                self.dismiss_alarm();
            }
            return;
        }

        self.notice = None;

        match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                return;
            }
            KeyCode::F(n @ 1..=3) => {
                self.tab = Tab::ALL[usize::from(n - 1)];
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Todo => self.handle_todo_key(key),
            Tab::Alarm => self.handle_alarm_key(key),
            Tab::Calculator => self.handle_calc_key(key),
        }
    }

    /// Dismiss the ringing alarm, if any.
    pub fn dismiss_alarm(&mut self) {
        if let Some(alarm) = self.scheduler.dismiss() {
            self.notice = Some(format!("Dismissed \"{}\" ({})", alarm.name, alarm.time));
        }
    }

    // -- To-do ----------------------------------------------------------

    fn handle_todo_key(&mut self, key: KeyEvent) {
        match self.todo_focus {
            TodoFocus::Input => match key.code {
                KeyCode::Enter => self.submit_task(),
                KeyCode::Down if !self.todos.is_empty() => self.todo_focus = TodoFocus::List,
                _ => {
                    self.todo_input.handle_key(key);
                }
            },
            TodoFocus::List => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    if self.todo_selected == 0 {
                        self.todo_focus = TodoFocus::Input;
                    } else {
                        self.todo_selected -= 1;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.todo_selected + 1 < self.todos.len() {
                        self.todo_selected += 1;
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_task(),
                KeyCode::Delete | KeyCode::Char('d') => self.delete_selected_task(),
                KeyCode::Esc | KeyCode::Char('i' | 'a') => self.todo_focus = TodoFocus::Input,
                _ => {}
            },
        }
    }

    /// Add the input text as a task. Blank input is ignored.
    pub fn submit_task(&mut self) {
        match self.todos.add(self.todo_input.value()) {
            Ok(_) => self.todo_input.clear(),
            Err(err) => tracing::debug!(error = %err, "task not added"),
        }
    }

    fn toggle_selected_task(&mut self) {
        if let Some(id) = self.todos.tasks().get(self.todo_selected).map(|t| t.id)
            && let Err(err) = self.todos.toggle(id)
        {
            tracing::warn!(error = %err, "toggle failed");
        }
    }

    fn delete_selected_task(&mut self) {
        if let Some(id) = self.todos.tasks().get(self.todo_selected).map(|t| t.id)
            && let Err(err) = self.todos.delete(id)
        {
            tracing::warn!(error = %err, "delete failed");
        }
        if self.todos.is_empty() {
            self.todo_selected = 0;
            self.todo_focus = TodoFocus::Input;
        } else {
            self.todo_selected = self.todo_selected.min(self.todos.len() - 1);
        }
    }

    // -- Alarm ----------------------------------------------------------

    fn handle_alarm_key(&mut self, key: KeyEvent) {
        match self.alarm_focus {
            AlarmFocus::Time | AlarmFocus::Name => match key.code {
                KeyCode::Enter => self.submit_alarm(),
                KeyCode::Up => {
                    if self.alarm_focus == AlarmFocus::Name {
                        self.alarm_focus = AlarmFocus::Time;
                    }
                }
                KeyCode::Down => {
                    self.alarm_focus = match self.alarm_focus {
                        AlarmFocus::Time => AlarmFocus::Name,
                        _ if self.scheduler.alarms().book().alarms().is_empty() => {
                            AlarmFocus::Name
                        }
                        _ => AlarmFocus::List,
                    };
                }
                _ => {
                    let field = if self.alarm_focus == AlarmFocus::Time {
                        &mut self.alarm_time
                    } else {
                        &mut self.alarm_name
                    };
                    field.handle_key(key);
                }
            },
            AlarmFocus::List => {
                let count = self.scheduler.alarms().book().alarms().len();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        if self.alarm_selected == 0 {
                            self.alarm_focus = AlarmFocus::Name;
                        } else {
                            self.alarm_selected -= 1;
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        if self.alarm_selected + 1 < count {
                            self.alarm_selected += 1;
                        }
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_alarm(),
                    KeyCode::Delete | KeyCode::Char('d') => self.delete_selected_alarm(),
                    KeyCode::Esc | KeyCode::Char('a') => self.alarm_focus = AlarmFocus::Time,
                    _ => {}
                }
            }
        }
    }

    /// Add an alarm from the form. The name field is cleared on success;
    /// the time is kept.
    pub fn submit_alarm(&mut self) {
        let result = self
            .scheduler
            .alarms_mut()
            .add(self.alarm_time.value(), self.alarm_name.value().trim())
            .map(|a| (a.time.clone(), a.name.clone()));
        match result {
            Ok((time, name)) => {
                self.alarm_name.clear();
                self.notice = Some(format!("Alarm \"{name}\" set for {time}"));
            }
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    fn selected_alarm_id(&self) -> Option<u64> {
        self.scheduler
            .alarms()
            .book()
            .alarms()
            .get(self.alarm_selected)
            .map(|a| a.id)
    }

    fn toggle_selected_alarm(&mut self) {
        if let Some(id) = self.selected_alarm_id()
            && let Err(err) = self.scheduler.alarms_mut().toggle(id)
        {
            tracing::warn!(error = %err, "toggle failed");
        }
    }

    fn delete_selected_alarm(&mut self) {
        if let Some(id) = self.selected_alarm_id()
            && let Err(err) = self.scheduler.alarms_mut().delete(id)
        {
            tracing::warn!(error = %err, "delete failed");
        }
        let count = self.scheduler.alarms().book().alarms().len();
        if count == 0 {
            self.alarm_selected = 0;
            self.alarm_focus = AlarmFocus::Time;
        } else {
            self.alarm_selected = self.alarm_selected.min(count - 1);
        }
    }

    // -- Calculator -----------------------------------------------------

    fn handle_calc_key(&mut self, key: KeyEvent) {
        let (row, col) = self.calc_cursor;
        match key.code {
            KeyCode::Up => self.calc_cursor.0 = row.saturating_sub(1),
            KeyCode::Down => self.calc_cursor.0 = (row + 1).min(CALC_GRID.len() - 1),
            KeyCode::Left => self.calc_cursor.1 = col.saturating_sub(1),
            KeyCode::Right => self.calc_cursor.1 = (col + 1).min(CALC_GRID[0].len() - 1),
            KeyCode::Char(' ') => self.calculator.press(CALC_GRID[row][col].key),
            _ => {
                if let Some(calc_key) = calc_key_for(key) {
                    self.calculator.press(calc_key);
                }
            }
        }
    }
}
