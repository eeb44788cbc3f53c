//! Integration tests for alarm ringing through the scheduler and ticker.
//!
//! # Verification Focus
//!
//! - A matching enabled alarm starts ringing on a real ticker tick
//! - No re-trigger later in the same minute
//! - Dismissal disables the alarm and the change reaches disk
//! - Tie-break: the first alarm in list order rings, the other is skipped
//! - Stopping the scheduler halts ticking
//! - The ringing overlay is raised regardless of the active tab

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parking_lot::Mutex;
use prodhub::app::{App, Tab};
use prodhub::config::HubConfig;
use prodhub::scheduler::{AlarmScheduler, ManualClock, PollOutcome};
use prodhub_core::alarm::{AlarmBook, AlarmClock, Sound, SoundError};
use prodhub_core::store::{FileStore, InMemoryStore, KvStore};

const PERIOD: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
struct Calls {
    starts: usize,
    stops: usize,
}

struct RecordingSound(Arc<Mutex<Calls>>);

impl Sound for RecordingSound {
    fn start(&mut self) -> Result<(), SoundError> {
        self.0.lock().starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.0.lock().stops += 1;
    }
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn scheduler_over(
    store: Arc<dyn KvStore>,
    clock: &ManualClock,
) -> (AlarmScheduler, Arc<Mutex<Calls>>) {
    let calls = Arc::new(Mutex::new(Calls::default()));
    let alarms = AlarmClock::new(
        AlarmBook::load(store),
        Box::new(RecordingSound(Arc::clone(&calls))),
    );
    (AlarmScheduler::new(alarms, Box::new(clock.clone())), calls)
}

/// Poll until at least one tick has been processed.
async fn next_poll(sched: &mut AlarmScheduler) -> PollOutcome {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let outcome = sched.poll();
            if outcome.ticks > 0 {
                return outcome;
            }
            tokio::time::sleep(PERIOD / 2).await;
        }
    })
    .await
    .expect("ticker should deliver a tick")
}

// =============================================================================
// Ringing once per matching minute
// =============================================================================

#[tokio::test]
async fn alarm_rings_once_at_its_minute() {
    let clock = ManualClock::new(at(7, 29, 58));
    let (mut sched, calls) = scheduler_over(Arc::new(InMemoryStore::new()), &clock);
    sched.alarms_mut().add_at("07:30", "Wake up", 1).unwrap();
    sched.start(PERIOD);

    let outcome = next_poll(&mut sched).await;
    assert!(outcome.started.is_none(), "07:29 must not ring");

    clock.set(at(7, 30, 0));
    let outcome = next_poll(&mut sched).await;
    assert_eq!(outcome.started.unwrap().name, "Wake up");
    assert_eq!(sched.ringing().unwrap().time, "07:30");

    clock.set(at(7, 30, 45));
    let outcome = next_poll(&mut sched).await;
    assert!(outcome.started.is_none(), "no re-trigger within the minute");
    assert_eq!(calls.lock().starts, 1);
}

#[tokio::test]
async fn dismissal_disables_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KvStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let clock = ManualClock::new(at(7, 30, 0));
    let (mut sched, calls) = scheduler_over(Arc::clone(&store), &clock);
    let id = sched.alarms_mut().add_at("07:30", "", 1).unwrap().id;
    sched.start(PERIOD);

    assert!(next_poll(&mut sched).await.started.is_some());
    let dismissed = sched.dismiss().unwrap();
    assert_eq!(dismissed.name, "Alarm");
    assert!(sched.ringing().is_none());
    assert_eq!(calls.lock().stops, 1);

    // Still 07:30, but the alarm is now disabled.
    assert!(next_poll(&mut sched).await.started.is_none());

    let reopened = AlarmBook::load(Arc::new(FileStore::open(dir.path()).unwrap()));
    assert!(!reopened.get(id).unwrap().enabled);
}

#[tokio::test]
async fn simultaneous_alarms_ring_first_in_list_order() {
    let clock = ManualClock::new(at(6, 0, 0));
    let (mut sched, calls) = scheduler_over(Arc::new(InMemoryStore::new()), &clock);
    sched.alarms_mut().add_at("06:00", "first", 1).unwrap();
    sched.alarms_mut().add_at("06:00", "second", 2).unwrap();
    sched.start(PERIOD);

    assert_eq!(next_poll(&mut sched).await.started.unwrap().name, "first");
    clock.set(at(6, 0, 30));
    assert!(next_poll(&mut sched).await.started.is_none());

    // Once the minute is over, the skipped alarm stays skipped.
    clock.set(at(6, 1, 0));
    sched.dismiss();
    assert!(next_poll(&mut sched).await.started.is_none());
    assert_eq!(calls.lock().starts, 1);
}

// =============================================================================
// Ticker lifecycle
// =============================================================================

#[tokio::test]
async fn stopped_scheduler_does_not_ring() {
    let clock = ManualClock::new(at(7, 0, 0));
    let (mut sched, calls) = scheduler_over(Arc::new(InMemoryStore::new()), &clock);
    sched.alarms_mut().add_at("07:00", "late", 1).unwrap();
    sched.start(PERIOD);
    sched.stop();
    assert!(!sched.is_running());

    tokio::time::sleep(PERIOD * 5).await;
    assert_eq!(sched.poll(), PollOutcome::default());
    assert!(sched.ringing().is_none());
    assert_eq!(calls.lock().starts, 0);
}

#[tokio::test]
async fn restart_replaces_ticker() {
    let clock = ManualClock::new(at(12, 0, 0));
    let (mut sched, _calls) = scheduler_over(Arc::new(InMemoryStore::new()), &clock);
    sched.start(PERIOD);
    sched.start(PERIOD);
    assert!(sched.is_running());
    assert!(next_poll(&mut sched).await.ticks > 0);
}

// =============================================================================
// App wiring
// =============================================================================

#[tokio::test]
async fn ringing_overlay_shows_on_any_tab_and_dismisses() {
    let store: Arc<dyn KvStore> = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(at(8, 15, 0));
    let calls = Arc::new(Mutex::new(Calls::default()));
    let mut app = App::with_store(
        &store,
        Box::new(RecordingSound(Arc::clone(&calls))),
        Box::new(clock.clone()),
        &HubConfig::default(),
    );
    app.scheduler.alarms_mut().add_at("08:15", "standup", 1).unwrap();
    app.tab = Tab::Calculator;
    app.scheduler.start(PERIOD);

    tokio::time::timeout(Duration::from_secs(5), async {
        while app.on_tick().started.is_none() {
            tokio::time::sleep(PERIOD / 2).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(app.scheduler.ringing().unwrap().name, "standup");

    // Calculator keys are swallowed while the overlay is up.
    app.handle_key_event(KeyEvent::new(KeyCode::Char('7'), KeyModifiers::NONE));
    assert_eq!(app.calculator.display(), "0");

    app.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert!(app.scheduler.ringing().is_none());
    assert_eq!(app.tab, Tab::Calculator);
    assert!(!app.scheduler.alarms().book().alarms()[0].enabled);
    assert_eq!(calls.lock().stops, 1);
}

#[tokio::test]
async fn clock_refreshes_on_tick() {
    let store: Arc<dyn KvStore> = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(at(9, 0, 0));
    let mut app = App::with_store(
        &store,
        Box::new(prodhub_core::alarm::Silence),
        Box::new(clock.clone()),
        &HubConfig::default(),
    );
    assert_eq!(app.now, at(9, 0, 0));

    clock.set(at(9, 0, 1));
    app.scheduler.start(PERIOD);
    tokio::time::timeout(Duration::from_secs(5), async {
        while app.on_tick().ticks == 0 {
            tokio::time::sleep(PERIOD / 2).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(app.now, at(9, 0, 1));
}
