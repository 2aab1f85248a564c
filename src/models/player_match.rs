//! Player participation in a match.

use serde::{Deserialize, Serialize};

use super::PlayerRole;

/// One player's entry in one match, keyed by (player_id, match_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayerMatch {
    pub player_id: i64,
    pub match_id: String,
    pub player_role: Option<PlayerRole>,
    pub seed: Option<i64>,
    /// Entry type (Q = qualifier, WC = wild card, LL = lucky loser, ...)
    pub entry: Option<String>,
    pub ranking: Option<i64>,
    pub ranking_points: Option<i64>,
    pub age: Option<i64>,
}
