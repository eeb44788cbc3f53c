//! Integration tests for the tabbed shell and its storage wiring.
//!
//! # Verification Focus
//!
//! - Tab navigation with Tab, Shift+Tab and F1-F3
//! - Tasks and alarms written through the app survive a reload from disk
//! - Storage falls back to memory when the data directory is unusable
//! - The ringing overlay swallows keys until dismissed
//! - Ctrl+Q and Ctrl+C quit from any tab, even while ringing
//! - Each tab renders without panicking on a test backend

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prodhub::app::{AlarmFocus, App, Tab, TodoFocus};
use prodhub::config::HubConfig;
use prodhub::scheduler::ManualClock;
use prodhub::storage::Storage;
use prodhub::ui;
use prodhub_core::alarm::Silence;
use prodhub_core::store::{InMemoryStore, KvStore};
use ratatui::{Terminal, backend::TestBackend};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn app_over(store: &Arc<dyn KvStore>, clock: &ManualClock) -> App {
    App::with_store(
        store,
        Box::new(Silence),
        Box::new(clock.clone()),
        &HubConfig::default(),
    )
}

fn memory_app() -> App {
    let store: Arc<dyn KvStore> = Arc::new(InMemoryStore::new());
    app_over(&store, &ManualClock::new(at(10, 0)))
}

fn file_storage(dir: &Path) -> Storage {
    Storage::open(&HubConfig {
        data_dir: Some(dir.to_path_buf()),
        ..HubConfig::default()
    })
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

fn ctrl(app: &mut App, c: char) {
    app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect()
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn starts_on_todo_tab_with_input_focus() {
    let app = memory_app();
    assert_eq!(app.tab, Tab::Todo);
    assert_eq!(app.todo_focus, TodoFocus::Input);
    assert_eq!(app.alarm_focus, AlarmFocus::Time);
    assert!(!app.should_quit);
}

#[test]
fn function_keys_select_tabs() {
    let mut app = memory_app();
    press(&mut app, KeyCode::F(3));
    assert_eq!(app.tab, Tab::Calculator);
    press(&mut app, KeyCode::F(1));
    assert_eq!(app.tab, Tab::Todo);
    press(&mut app, KeyCode::F(2));
    assert_eq!(app.tab, Tab::Alarm);
    // F4 and beyond are not tabs.
    press(&mut app, KeyCode::F(4));
    assert_eq!(app.tab, Tab::Alarm);
}

#[test]
fn tab_and_backtab_wrap_around() {
    let mut app = memory_app();
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.tab, Tab::Calculator);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.tab, Tab::Todo);
}

#[test]
fn tab_state_is_kept_across_switches() {
    let mut app = memory_app();
    type_str(&mut app, "half typed");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.todo_input.value(), "half typed");
}

#[test]
fn control_keys_quit() {
    let mut app = memory_app();
    ctrl(&mut app, 'q');
    assert!(app.should_quit);

    let mut app = memory_app();
    press(&mut app, KeyCode::F(3));
    ctrl(&mut app, 'c');
    assert!(app.should_quit);
}

#[test]
fn plain_q_is_text_not_quit() {
    let mut app = memory_app();
    type_str(&mut app, "q");
    assert!(!app.should_quit);
    assert_eq!(app.todo_input.value(), "q");
}

// =============================================================================
// Persistence wiring
// =============================================================================

#[test]
fn tasks_and_alarms_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(at(10, 0));

    {
        let storage = file_storage(dir.path());
        assert!(storage.is_persistent());
        let mut app = app_over(&storage.store, &clock);

        type_str(&mut app, "water plants");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "pay rent");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "Gym");
        press(&mut app, KeyCode::Enter);
    }

    let storage = file_storage(dir.path());
    let app = app_over(&storage.store, &clock);

    let tasks = app.todos.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].text, "water plants");
    assert!(tasks[0].completed);
    assert_eq!(tasks[1].text, "pay rent");
    assert!(!tasks[1].completed);

    let alarms = app.scheduler.alarms().book().alarms();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].name, "Gym");
    assert_eq!(alarms[0].time, "07:30");
    assert!(alarms[0].enabled);
}

#[test]
fn unusable_data_dir_falls_back_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let storage = file_storage(&blocker);
    assert!(!storage.is_persistent());

    let mut app = app_over(&storage.store, &ManualClock::new(at(10, 0)))
        .with_persistence(storage.is_persistent());
    type_str(&mut app, "still works");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.todos.len(), 1);
    assert!(!app.persistent);
}

#[test]
fn in_memory_flag_skips_disk() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::open(&HubConfig {
        data_dir: Some(dir.path().join("unused")),
        in_memory: true,
        ..HubConfig::default()
    });
    assert!(!storage.is_persistent());
    assert!(!dir.path().join("unused").exists());
}

// =============================================================================
// Ringing overlay
// =============================================================================

fn ringing_app() -> App {
    let clock = ManualClock::new(at(6, 45));
    let store: Arc<dyn KvStore> = Arc::new(InMemoryStore::new());
    let mut app = app_over(&store, &clock);
    app.scheduler
        .alarms_mut()
        .add_at("06:45", "Bus", 1)
        .unwrap();
    app.tick_once();
    assert!(app.scheduler.ringing().is_some());
    app
}

#[test]
fn overlay_swallows_navigation_and_text() {
    let mut app = ringing_app();
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::F(3));
    type_str(&mut app, "xyz");
    assert_eq!(app.tab, Tab::Todo);
    assert_eq!(app.todo_input.value(), "");
    assert!(app.scheduler.ringing().is_some());
}

#[test]
fn overlay_dismiss_keys() {
    for code in [
        KeyCode::Enter,
        KeyCode::Esc,
        KeyCode::Char(' '),
        KeyCode::Char('d'),
    ] {
        let mut app = ringing_app();
        press(&mut app, code);
        assert!(app.scheduler.ringing().is_none(), "{code:?} should dismiss");
        assert!(app.notice.as_deref().unwrap().contains("Bus"));
    }
}

#[test]
fn quit_works_while_ringing() {
    let mut app = ringing_app();
    ctrl(&mut app, 'q');
    assert!(app.should_quit);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn every_tab_renders() {
    let mut app = memory_app();
    let todo = screen(&app);
    assert!(todo.contains("Productivity Hub"));
    assert!(todo.contains("Your to-do list is empty"));

    press(&mut app, KeyCode::F(2));
    let alarm = screen(&app);
    assert!(alarm.contains("No alarms set."));
    assert!(alarm.contains("10:00:00"));

    press(&mut app, KeyCode::F(3));
    let calc = screen(&app);
    assert!(calc.contains("Scientific Calculator"));
    assert!(calc.contains("sin"));
}

#[test]
fn ringing_overlay_renders_over_active_tab() {
    let mut app = ringing_app();
    app.tab = Tab::Calculator;
    let text = screen(&app);
    assert!(text.contains("ALARM"));
    assert!(text.contains("Bus"));
    assert!(text.contains("06:45"));
}
