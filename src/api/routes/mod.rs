//! HTTP handlers, grouped by concern.

pub mod index;
pub mod players;
pub mod reports;
