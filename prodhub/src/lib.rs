//! Productivity Hub: a terminal to-do list, alarm clock and scientific
//! calculator.

pub mod app;
pub mod config;
pub mod scheduler;
pub mod sound;
pub mod storage;
pub mod ui;
