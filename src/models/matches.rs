//! Match model.

use serde::{Deserialize, Serialize};

/// A single match within a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub match_id: String,
    pub tourney_id: String,
    pub match_num: Option<i64>,
    pub score: Option<String>,
    /// "3" or "5"
    pub best_of: Option<String>,
    /// Round label (R128, QF, F, ...)
    pub round: Option<String>,
    pub minutes: Option<i64>,
}
