//! Core data models for the tennis schema.

mod country;
mod hand;
mod match_stats;
mod matches;
mod player;
mod player_match;
mod role;
mod tournament;

pub use country::*;
pub use hand::*;
pub use match_stats::*;
pub use matches::*;
pub use player::*;
pub use player_match::*;
pub use role::*;
pub use tournament::*;
