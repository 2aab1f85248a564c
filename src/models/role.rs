//! Player role within a match.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which side of a match a player was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PlayerRole {
    Winner,
    Loser,
}

impl PlayerRole {
    /// Suffix used on `match_stats_id` for this side's serve statistics.
    pub fn stats_suffix(&self) -> &'static str {
        match self {
            PlayerRole::Winner => "-w",
            PlayerRole::Loser => "-l",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Winner => "winner",
            PlayerRole::Loser => "loser",
        }
    }
}

impl std::fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "winner" => Ok(PlayerRole::Winner),
            "loser" => Ok(PlayerRole::Loser),
            other => Err(format!("unknown player role '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("winner".parse::<PlayerRole>(), Ok(PlayerRole::Winner));
        assert_eq!("loser".parse::<PlayerRole>(), Ok(PlayerRole::Loser));
        assert!("Winner".parse::<PlayerRole>().is_err());
        assert!("".parse::<PlayerRole>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&PlayerRole::Loser).unwrap();
        assert_eq!(json, "\"loser\"");

        let parsed: PlayerRole = serde_json::from_str("\"winner\"").unwrap();
        assert_eq!(parsed, PlayerRole::Winner);
    }

    #[test]
    fn test_stats_suffix() {
        assert_eq!(PlayerRole::Winner.stats_suffix(), "-w");
        assert_eq!(PlayerRole::Loser.stats_suffix(), "-l");
    }
}
