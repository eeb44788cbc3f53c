//! Alarm list, ringing state and per-tick matching.
//!
//! [`AlarmBook`] is the persisted, time-sorted list of alarms.
//! [`AlarmClock`] wraps it with the single ringing slot and the audio
//! collaborator, and decides on every [`tick`](AlarmClock::tick) whether
//! an alarm starts ringing. Driving the ticks is left to the caller.

use std::sync::Arc;

use chrono::{NaiveTime, Timelike};

use crate::model::{Alarm, DEFAULT_ALARM_NAME, fresh_id, now_ms};
use crate::store::{ALARMS_NAMESPACE, KvStore, ListStore};

/// Errors that can occur during alarm list operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AlarmError {
    /// The time is not a valid 24-hour `HH:MM` value.
    #[error("invalid alarm time: {0:?} (expected HH:MM)")]
    InvalidTime(String),
    /// No alarm has the given id.
    #[error("alarm not found: {0}")]
    NotFound(u64),
}

/// Errors reported by a [`Sound`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    /// The playback could not be started.
    #[error("failed to start playback: {0}")]
    StartFailed(String),
}

/// Audio used to sound a ringing alarm.
pub trait Sound {
    /// Start looped playback.
    ///
    /// # Errors
    ///
    /// Returns [`SoundError`] if playback cannot start. Callers treat
    /// this as non-fatal.
    fn start(&mut self) -> Result<(), SoundError>;

    /// Stop playback and rewind to the beginning.
    fn stop(&mut self);

    /// Called on every tick while ringing; keeps the loop going for
    /// backends that need it.
    fn tick(&mut self) {}
}

/// A [`Sound`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl Sound for Silence {
    fn start(&mut self) -> Result<(), SoundError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Parse and normalize an alarm time to zero-padded `HH:MM`.
///
/// Accepts `H:MM` and `HH:MM` in 24-hour form.
///
/// # Errors
///
/// Returns [`AlarmError::InvalidTime`] for anything else.
pub fn parse_alarm_time(input: &str) -> Result<String, AlarmError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map(|t| format_hhmm(&t))
        .map_err(|_| AlarmError::InvalidTime(input.to_string()))
}

/// Format a time of day as zero-padded `HH:MM`, dropping seconds.
#[must_use]
pub fn format_hhmm(time: &impl Timelike) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Time-sorted alarm list mirrored to a [`ListStore`].
pub struct AlarmBook {
    alarms: Vec<Alarm>,
    store: ListStore<Alarm>,
}

impl AlarmBook {
    /// Load the list from the `alarms` namespace of `backend`.
    ///
    /// Unreadable data yields an empty list (see [`ListStore::load`]).
    #[must_use]
    pub fn load(backend: Arc<dyn KvStore>) -> Self {
        let store = ListStore::new(backend, ALARMS_NAMESPACE);
        let alarms = store.load();
        Self { alarms, store }
    }

    /// Alarms in ascending time order.
    #[must_use]
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    /// Look up an alarm by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    /// Add an enabled alarm and re-sort the list by time.
    ///
    /// An empty `name` becomes [`DEFAULT_ALARM_NAME`]. Alarms sharing a
    /// time keep their insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::InvalidTime`] if `time` is not `HH:MM`.
    pub fn add(&mut self, time: &str, name: &str) -> Result<&Alarm, AlarmError> {
        self.add_at(time, name, now_ms())
    }

    /// [`add`](Self::add) with an explicit creation time in epoch ms.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::InvalidTime`] if `time` is not `HH:MM`.
    pub fn add_at(&mut self, time: &str, name: &str, now: u64) -> Result<&Alarm, AlarmError> {
        let time = parse_alarm_time(time)?;
        let id = fresh_id(now, self.alarms.iter().map(|a| a.id));
        let name = if name.is_empty() {
            DEFAULT_ALARM_NAME.to_string()
        } else {
            name.to_string()
        };
        self.alarms.push(Alarm {
            id,
            time,
            name,
            enabled: true,
        });
        self.alarms.sort_by(|a, b| a.time.cmp(&b.time));
        tracing::debug!(id, "alarm added");
        self.flush();
        self.get(id).ok_or(AlarmError::NotFound(id))
    }

    /// Flip the enabled flag of alarm `id`, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::NotFound`] if no alarm has that id.
    pub fn toggle(&mut self, id: u64) -> Result<bool, AlarmError> {
        let alarm = self
            .alarms
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AlarmError::NotFound(id))?;
        alarm.enabled = !alarm.enabled;
        let enabled = alarm.enabled;
        tracing::debug!(id, enabled, "alarm toggled");
        self.flush();
        Ok(enabled)
    }

    /// Remove alarm `id`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::NotFound`] if no alarm has that id.
    pub fn delete(&mut self, id: u64) -> Result<Alarm, AlarmError> {
        let idx = self
            .alarms
            .iter()
            .position(|a| a.id == id)
            .ok_or(AlarmError::NotFound(id))?;
        let alarm = self.alarms.remove(idx);
        tracing::debug!(id, "alarm deleted");
        self.flush();
        Ok(alarm)
    }

    /// First enabled alarm, in list order, set for `hhmm`.
    #[must_use]
    pub fn first_due(&self, hhmm: &str) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.enabled && a.time == hhmm)
    }

    fn flush(&self) {
        self.store.save(&self.alarms);
    }
}

/// What a tick did to the ringing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing rang and nothing is ringing.
    Idle,
    /// This alarm just started ringing.
    Started(Alarm),
    /// An alarm was already ringing; matching was skipped.
    StillRinging,
}

/// Alarm list plus the single "currently ringing" slot.
///
/// At most one alarm rings at a time. While one rings, ticks do not scan
/// the list, so neither the same alarm (still inside its matching
/// minute) nor a second alarm can start.
pub struct AlarmClock {
    book: AlarmBook,
    ringing: Option<Alarm>,
    sound: Box<dyn Sound + Send>,
    sound_failed: bool,
}

impl AlarmClock {
    /// Build a clock over `book` that sounds alarms with `sound`.
    #[must_use]
    pub fn new(book: AlarmBook, sound: Box<dyn Sound + Send>) -> Self {
        Self {
            book,
            ringing: None,
            sound,
            sound_failed: false,
        }
    }

    /// The alarm list.
    #[must_use]
    pub const fn book(&self) -> &AlarmBook {
        &self.book
    }

    /// The alarm currently ringing, if any.
    #[must_use]
    pub const fn ringing(&self) -> Option<&Alarm> {
        self.ringing.as_ref()
    }

    /// Whether the last ring failed to start its sound.
    #[must_use]
    pub const fn sound_failed(&self) -> bool {
        self.sound_failed
    }

    /// Evaluate one tick at local time `now`.
    pub fn tick(&mut self, now: NaiveTime) -> TickOutcome {
        if self.ringing.is_some() {
            self.sound.tick();
            return TickOutcome::StillRinging;
        }

        let hhmm = format_hhmm(&now);
        let Some(alarm) = self.book.first_due(&hhmm).cloned() else {
            return TickOutcome::Idle;
        };

        tracing::info!(id = alarm.id, name = %alarm.name, time = %alarm.time, "alarm ringing");
        self.sound_failed = false;
        if let Err(err) = self.sound.start() {
            tracing::warn!(error = %err, "alarm sound did not start");
            self.sound_failed = true;
        }
        self.ringing = Some(alarm.clone());
        TickOutcome::Started(alarm)
    }

    /// Silence the ringing alarm and disable it so it does not ring again
    /// until re-enabled. Returns the dismissed alarm.
    pub fn dismiss(&mut self) -> Option<Alarm> {
        let alarm = self.ringing.take()?;
        self.sound.stop();
        self.sound_failed = false;
        // Leave it alone if it was already switched off while ringing.
        if self.book.get(alarm.id).is_some_and(|a| a.enabled)
            && let Err(err) = self.book.toggle(alarm.id)
        {
            tracing::warn!(id = alarm.id, error = %err, "could not disable dismissed alarm");
        }
        tracing::info!(id = alarm.id, "alarm dismissed");
        Some(alarm)
    }

    /// Add an alarm. See [`AlarmBook::add`].
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::InvalidTime`] if `time` is not `HH:MM`.
    pub fn add(&mut self, time: &str, name: &str) -> Result<&Alarm, AlarmError> {
        self.book.add(time, name)
    }

    /// Add an alarm with an explicit creation time. See [`AlarmBook::add_at`].
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::InvalidTime`] if `time` is not `HH:MM`.
    pub fn add_at(&mut self, time: &str, name: &str, now: u64) -> Result<&Alarm, AlarmError> {
        self.book.add_at(time, name, now)
    }

    /// Toggle an alarm. See [`AlarmBook::toggle`].
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::NotFound`] if no alarm has that id.
    pub fn toggle(&mut self, id: u64) -> Result<bool, AlarmError> {
        self.book.toggle(id)
    }

    /// Delete an alarm. Deleting the ringing alarm also silences it.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::NotFound`] if no alarm has that id.
    pub fn delete(&mut self, id: u64) -> Result<Alarm, AlarmError> {
        let alarm = self.book.delete(id)?;
        if self.ringing.as_ref().is_some_and(|r| r.id == id) {
            self.ringing = None;
            self.sound.stop();
            self.sound_failed = false;
        }
        Ok(alarm)
    }
}

impl Drop for AlarmClock {
    fn drop(&mut self) {
        if self.ringing.is_some() {
            self.sound.stop();
        }
    }
}
