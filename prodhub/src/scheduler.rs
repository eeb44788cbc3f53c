//! Periodic alarm evaluation.
//!
//! [`Ticker`] is a tokio interval task feeding a bounded channel.
//! [`AlarmScheduler`] owns the [`AlarmClock`], a [`Clock`] and the ticker;
//! the UI loop calls [`AlarmScheduler::poll`] once per frame, which runs
//! one alarm tick per tick event received.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use prodhub_core::alarm::{AlarmClock, TickOutcome};
use prodhub_core::model::Alarm;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Ticks buffered between two polls. Extra ticks are dropped; one alarm
/// tick per poll is enough to catch the current minute.
const TICK_BUFFER: usize = 4;

/// Source of the local wall-clock time.
pub trait Clock: Send {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The host's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    /// A clock stopped at `start`.
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to `time`.
    pub fn set(&self, time: NaiveDateTime) {
        *self.now.lock() = time;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// Background interval task that emits a unit event every period.
///
/// The task is aborted when the ticker is stopped or dropped.
pub struct Ticker {
    rx: mpsc::Receiver<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn the interval task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(TICK_BUFFER);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match tx.try_send(()) {
                    Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                    Err(mpsc::error::TrySendError::Closed(())) => break,
                }
            }
        });
        Self { rx, handle }
    }

    /// Take every tick received since the last call, returning how many.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    /// Wait for the next tick. Returns `false` once the task is gone.
    pub async fn next(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Abort the interval task.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Whether the interval task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// What a [`poll`](AlarmScheduler::poll) did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// Tick events consumed.
    pub ticks: usize,
    /// The alarm that started ringing during this poll, if any.
    pub started: Option<Alarm>,
}

/// Drives an [`AlarmClock`] from a [`Ticker`].
pub struct AlarmScheduler {
    alarms: AlarmClock,
    clock: Box<dyn Clock>,
    ticker: Option<Ticker>,
}

impl AlarmScheduler {
    /// Build a stopped scheduler.
    #[must_use]
    pub fn new(alarms: AlarmClock, clock: Box<dyn Clock>) -> Self {
        Self {
            alarms,
            clock,
            ticker: None,
        }
    }

    /// Start ticking every `period`, replacing any running ticker.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&mut self, period: Duration) {
        self.stop();
        tracing::debug!(period = ?period, "alarm scheduler started");
        self.ticker = Some(Ticker::spawn(period));
    }

    /// Cancel the ticker. Ticks already buffered are discarded.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
            tracing::debug!("alarm scheduler stopped");
        }
    }

    /// Whether a ticker is attached and alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Current local time according to the scheduler's clock.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// The alarm list and ringing state.
    #[must_use]
    pub const fn alarms(&self) -> &AlarmClock {
        &self.alarms
    }

    /// Mutable access for list edits and dismissal.
    pub const fn alarms_mut(&mut self) -> &mut AlarmClock {
        &mut self.alarms
    }

    /// The alarm currently ringing, if any.
    #[must_use]
    pub const fn ringing(&self) -> Option<&Alarm> {
        self.alarms.ringing()
    }

    /// Silence and disable the ringing alarm.
    pub fn dismiss(&mut self) -> Option<Alarm> {
        self.alarms.dismiss()
    }

    /// Run one alarm tick at the clock's current time.
    pub fn tick_now(&mut self) -> TickOutcome {
        let now = self.clock.now().time();
        self.alarms.tick(now)
    }

    /// Consume pending tick events, running one alarm tick for each.
    pub fn poll(&mut self) -> PollOutcome {
        let ticks = self.ticker.as_mut().map_or(0, Ticker::drain);
        let mut outcome = PollOutcome {
            ticks,
            started: None,
        };
        for _ in 0..ticks {
            if let TickOutcome::Started(alarm) = self.tick_now() {
                outcome.started = Some(alarm);
            }
        }
        outcome
    }
}

impl Drop for AlarmScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
