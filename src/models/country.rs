//! Country lookup table.

use serde::{Deserialize, Serialize};

/// A country keyed by its IOC code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Country {
    pub ioc: String,
    pub country_name: Option<String>,
}

impl Country {
    /// Derive an IOC-style key from a country name: first three characters, uppercased.
    ///
    /// This is not the real IOC code in general ("Germany" gives "GER", but
    /// "Switzerland" gives "SWI" rather than "SUI").
    pub fn key_for(name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(name.chars().take(3).collect::<String>().to_uppercase())
    }
}
