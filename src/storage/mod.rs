//! SQLite storage.
//!
//! Handles the relational side of the system:
//! - Connection pool setup
//! - Schema creation for the seven `tennis_*` tables
//! - Per-table inserts and listings
//! - Aggregation reports
//! - Player create/update/delete

pub mod players;
pub mod records;
pub mod reports;
pub mod schema;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::debug;

pub use schema::create_tables;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cannot derive a {field} key from '{value}'")]
    InvalidKey { field: &'static str, value: String },
}

/// The tables of the schema, in foreign-key-safe load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Tournament,
    Hand,
    Country,
    Players,
    Matches,
    MatchStats,
    PlayerMatch,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Tournament,
        Table::Hand,
        Table::Country,
        Table::Players,
        Table::Matches,
        Table::MatchStats,
        Table::PlayerMatch,
    ];

    /// Get the database table name. These names are fixed.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Tournament => "tennis_tournament",
            Table::Hand => "tennis_hand",
            Table::Country => "tennis_country",
            Table::Players => "tennis_players",
            Table::Matches => "tennis_matches",
            Table::MatchStats => "tennis_matchstats",
            Table::PlayerMatch => "tennis_playermatch",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Open a connection pool for the given SQLite URL, creating the file if needed.
pub async fn connect(database_url: &str) -> Result<SqlitePool, StorageError> {
    if is_memory_url(database_url) {
        return connect_in_memory().await;
    }

    debug!("Opening database {}", database_url);
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open a private in-memory database.
///
/// Every SQLite connection to `:memory:` is a separate database, so the pool
/// is pinned to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}
