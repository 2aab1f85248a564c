//! Per-side serve statistics for a match.

use serde::{Deserialize, Serialize};

use super::PlayerRole;

/// Serve statistics for one side of a match.
///
/// The id carries a `-w` or `-l` suffix naming the side the numbers belong to.
/// Nothing in the schema ties a row to a player directly; attribution goes
/// through that suffix and the player's role in `tennis_playermatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchStats {
    pub match_stats_id: String,
    pub match_id: String,
    pub ace: Option<i64>,
    /// Double faults
    pub df: Option<i64>,
    /// Serve points
    pub svpt: Option<i64>,
    pub first_in: Option<i64>,
    pub first_won: Option<i64>,
    pub second_won: Option<i64>,
    /// Service games
    pub sv_gms: Option<i64>,
    pub bp_saved: Option<i64>,
    pub bp_faced: Option<i64>,
}

impl MatchStats {
    /// Side encoded in the id suffix, if any.
    pub fn side(&self) -> Option<PlayerRole> {
        side_of(&self.match_stats_id)
    }
}

/// Read the side from a `match_stats_id`.
pub fn side_of(match_stats_id: &str) -> Option<PlayerRole> {
    [PlayerRole::Winner, PlayerRole::Loser]
        .into_iter()
        .find(|role| match_stats_id.ends_with(role.stats_suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_of() {
        assert_eq!(side_of("2019-580-001-w"), Some(PlayerRole::Winner));
        assert_eq!(side_of("2019-580-001-l"), Some(PlayerRole::Loser));
        assert_eq!(side_of("2019-580-001"), None);
        assert_eq!(side_of("Stats_4"), None);
    }

    #[test]
    fn test_side_is_case_sensitive() {
        assert_eq!(side_of("M1-W"), None);
    }
}
