//! Persisted record types shared by the to-do list and the alarm clock.
//!
//! Field names are part of the storage format: a list saved by one
//! version must load in the next, so both structs serialize flat with
//! exactly the fields declared here.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Name given to alarms created without one.
pub const DEFAULT_ALARM_NAME: &str = "Alarm";

/// A single entry in the to-do list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Creation timestamp in milliseconds since epoch, unique per list.
    pub id: u64,
    /// Task text exactly as entered.
    pub text: String,
    /// Whether the task has been checked off.
    pub completed: bool,
}

/// A daily alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    /// Creation timestamp in milliseconds since epoch, unique per list.
    pub id: u64,
    /// Zero-padded 24-hour `HH:MM` time of day.
    pub time: String,
    /// Display label.
    pub name: String,
    /// Whether the alarm takes part in matching.
    pub enabled: bool,
}

/// Returns the current timestamp in milliseconds since epoch.
#[must_use]
pub fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}

/// Picks an id for a new record created at `now` (epoch ms).
///
/// Ids are creation timestamps, so two records created within the same
/// millisecond would collide; in that case the id is bumped past the
/// largest id already taken.
#[must_use]
pub fn fresh_id(now: u64, taken: impl IntoIterator<Item = u64>) -> u64 {
    match taken.into_iter().max() {
        Some(max) if max >= now => max.saturating_add(1),
        _ => now,
    }
}
