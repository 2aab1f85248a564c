//! Dominant hand lookup table.

use serde::{Deserialize, Serialize};

/// Dominant hand, keyed by a single letter (R, L, U, A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hand {
    pub hand: String,
    pub hand_description: Option<String>,
}

impl Hand {
    /// Derive the key for a free-text description: its first character, uppercased.
    ///
    /// Distinct descriptions sharing a first letter map to the same key.
    pub fn key_for(description: &str) -> Option<String> {
        let first = description.trim().chars().next()?;
        Some(first.to_uppercase().collect())
    }
}
