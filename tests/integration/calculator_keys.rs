//! Integration tests for the calculator tab driven by keyboard events.
//!
//! # Verification Focus
//!
//! - Typed expressions evaluate on Enter and `=`
//! - Power, factorial, functions and constants through the key map
//! - Evaluation failures show `Error`, which sticks until the next input
//! - Backspace and Delete map to the C and AC buttons
//! - The grid cursor presses the highlighted button

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prodhub::app::{App, CALC_GRID, Tab};
use prodhub::config::HubConfig;
use prodhub::scheduler::ManualClock;
use prodhub_core::alarm::Silence;
use prodhub_core::calc::Key;
use prodhub_core::store::{InMemoryStore, KvStore};

fn calculator_app() -> App {
    let store: Arc<dyn KvStore> = Arc::new(InMemoryStore::new());
    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let mut app = App::with_store(
        &store,
        Box::new(Silence),
        Box::new(ManualClock::new(start)),
        &HubConfig::default(),
    );
    app.handle_key_event(KeyEvent::new(KeyCode::F(3), KeyModifiers::NONE));
    assert_eq!(app.tab, Tab::Calculator);
    app
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn result_of(keys: &str) -> String {
    let mut app = calculator_app();
    type_str(&mut app, keys);
    press(&mut app, KeyCode::Enter);
    app.calculator.display().to_string()
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn basic_arithmetic() {
    assert_eq!(result_of("2+3"), "5");
    assert_eq!(result_of("2+3*4"), "14");
    assert_eq!(result_of("(2+3)*4"), "20");
    assert_eq!(result_of("7/2"), "3.5");
    assert_eq!(result_of("10%3"), "1");
}

#[test]
fn equals_key_and_enter_agree() {
    let mut app = calculator_app();
    type_str(&mut app, "6*7=");
    assert_eq!(app.calculator.display(), "42");
}

#[test]
fn float_results_render_shortest() {
    assert_eq!(result_of("0.1+0.2"), "0.30000000000000004");
    assert_eq!(result_of("1/3"), "0.3333333333333333");
}

#[test]
fn power_and_factorial() {
    assert_eq!(result_of("2^3"), "8");
    assert_eq!(result_of("2^3^2"), "512");
    assert_eq!(result_of("2^-1"), "0.5");
    assert_eq!(result_of("5!"), "120");
    assert_eq!(result_of("3!+1"), "7");
}

#[test]
fn function_keys_open_calls() {
    // `r` is the square root key.
    assert_eq!(result_of("r9)"), "3");
    assert_eq!(result_of("l100)"), "2");
    assert_eq!(result_of("s0)"), "0");
    assert_eq!(result_of("2*c0)"), "2");
}

#[test]
fn constant_keys_insert_values() {
    let mut app = calculator_app();
    press(&mut app, KeyCode::Char('p'));
    assert_eq!(app.calculator.display(), "3.141592653589793");
    type_str(&mut app, "*2=");
    assert_eq!(app.calculator.display(), "6.283185307179586");
}

#[test]
fn result_feeds_next_calculation() {
    let mut app = calculator_app();
    type_str(&mut app, "2+3=");
    type_str(&mut app, "*4=");
    assert_eq!(app.calculator.display(), "20");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn failures_show_error() {
    assert_eq!(result_of("1/0"), "Error");
    assert_eq!(result_of("2+"), "Error");
    assert_eq!(result_of("(2"), "Error");
    assert_eq!(result_of("-2^2"), "Error");
    assert_eq!(result_of("r-1)"), "Error");
}

#[test]
fn error_sticks_until_next_input() {
    let mut app = calculator_app();
    type_str(&mut app, "1/0=");
    assert!(app.calculator.is_error());

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.calculator.display(), "Error");

    type_str(&mut app, "8");
    assert_eq!(app.calculator.display(), "8");
    assert_eq!(app.calculator.expression(), "8");
}

// =============================================================================
// Editing keys
// =============================================================================

#[test]
fn backspace_removes_last_character() {
    let mut app = calculator_app();
    type_str(&mut app, "123");
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.calculator.display(), "12");
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.calculator.display(), "0");
}

#[test]
fn delete_and_escape_clear_all() {
    let mut app = calculator_app();
    type_str(&mut app, "9+9");
    press(&mut app, KeyCode::Delete);
    assert_eq!(app.calculator.display(), "0");
    assert_eq!(app.calculator.expression(), "");

    type_str(&mut app, "4");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.calculator.display(), "0");
}

#[test]
fn unmapped_keys_are_ignored() {
    let mut app = calculator_app();
    type_str(&mut app, "zqw");
    assert_eq!(app.calculator.display(), "0");
}

// =============================================================================
// Button grid
// =============================================================================

#[test]
fn grid_cursor_presses_highlighted_button() {
    let mut app = calculator_app();
    assert_eq!(app.calc_cursor, (0, 0));

    // Row 4 is `1 2 3 ! +`.
    for _ in 0..4 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.calculator.display(), "2");

    // `+` is the last column of the same row.
    for _ in 0..3 {
        press(&mut app, KeyCode::Right);
    }
    assert!(matches!(CALC_GRID[4][4].key, Key::Operator(_)));
    press(&mut app, KeyCode::Char(' '));
    type_str(&mut app, "2");

    // `=` sits in the bottom-right corner.
    press(&mut app, KeyCode::Down);
    assert_eq!(app.calc_cursor, (5, 4));
    assert_eq!(CALC_GRID[5][4].key, Key::Equals);
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.calculator.display(), "4");
}

#[test]
fn grid_cursor_clamps_at_edges() {
    let mut app = calculator_app();
    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.calc_cursor, (0, 0));
    for _ in 0..10 {
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
    }
    assert_eq!(app.calc_cursor, (5, 4));
}

#[test]
fn calculator_state_survives_tab_switches() {
    let mut app = calculator_app();
    type_str(&mut app, "12+");
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.tab, Tab::Todo);
    press(&mut app, KeyCode::F(3));
    type_str(&mut app, "30=");
    assert_eq!(app.calculator.display(), "42");
}
