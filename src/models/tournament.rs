//! Tournament model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tournament edition (e.g. one year of Wimbledon).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tournament {
    pub tourney_id: String,

    pub tourney_name: String,

    /// Court surface (Hard, Clay, Grass, ...)
    pub surface: Option<String>,

    pub draw_size: Option<i64>,

    /// Tier classification (G = Grand Slam, ...)
    pub tourney_level: Option<String>,

    /// First day of the tournament
    pub tourney_date: Option<NaiveDate>,
}

impl std::fmt::Display for Tournament {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tourney_date {
            Some(date) => write!(f, "{} ({})", self.tourney_name, date),
            None => write!(f, "{}", self.tourney_name),
        }
    }
}
