//! Widget state for Productivity Hub: the to-do list, the alarm clock
//! and the scientific calculator, plus the persistence layer they share.
//!
//! Nothing in this crate touches the terminal or spawns tasks; the
//! `prodhub` binary drives it.

pub mod alarm;
pub mod calc;
pub mod model;
pub mod store;
pub mod todo;
