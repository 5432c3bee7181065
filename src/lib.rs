//! Mood check-ins with sentiment analysis and consecutive-negative safety
//! alerts.

pub mod check_in;
pub mod classifier;
pub mod comparator;
pub mod config;
pub mod error;
pub mod history;
pub mod journal;
pub mod safety;
pub mod screening;
pub mod sentiment;
pub mod ui;
