//! Bulk CSV loader.
//!
//! Reads the seven source files in foreign-key-safe order and inserts one row
//! at a time. Foreign keys are resolved by exact-match lookup before each
//! insert. Any error aborts the run, and since the whole load shares one
//! transaction, the database is left as it was.

mod fields;

pub use fields::{nullify, parse_date, DATE_FORMAT};

use std::path::{Path, PathBuf};

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Country, Hand, Match, MatchStats, Player, PlayerMatch, Tournament};
use crate::storage::records;
use crate::storage::Table;
use fields::Row;

/// Errors that abort a load.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Missing input file: {0}")]
    MissingFile(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file}:{line}: missing column {column}")]
    ShortRow {
        file: &'static str,
        line: u64,
        column: &'static str,
    },

    #[error("{file}:{line}: invalid date '{value}' in {column} (expected YYYYMMDD)")]
    InvalidDate {
        file: &'static str,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("{file}:{line}: invalid integer '{value}' in {column}")]
    InvalidInteger {
        file: &'static str,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("{file}:{line}: invalid player role '{value}'")]
    InvalidRole {
        file: &'static str,
        line: u64,
        value: String,
    },

    #[error("{file}:{line}: no row in {table} with key '{key}'")]
    MissingReference {
        file: &'static str,
        line: u64,
        table: Table,
        key: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Source file name for each table.
pub fn csv_filename(table: Table) -> &'static str {
    match table {
        Table::Tournament => "Tournament.csv",
        Table::Hand => "Hand.csv",
        Table::Country => "Country.csv",
        Table::Players => "Players.csv",
        Table::Matches => "Matches.csv",
        Table::MatchStats => "Match_Stats.csv",
        Table::PlayerMatch => "Player_Match.csv",
    }
}

/// Rows inserted per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub tournaments: usize,
    pub hands: usize,
    pub countries: usize,
    pub players: usize,
    pub matches: usize,
    pub match_stats: usize,
    pub player_matches: usize,
    /// Stats rows whose id has neither a `-w` nor a `-l` suffix
    pub unattributed_stats: usize,
}

impl LoadSummary {
    fn record(&mut self, table: Table, rows: usize) {
        let slot = match table {
            Table::Tournament => &mut self.tournaments,
            Table::Hand => &mut self.hands,
            Table::Country => &mut self.countries,
            Table::Players => &mut self.players,
            Table::Matches => &mut self.matches,
            Table::MatchStats => &mut self.match_stats,
            Table::PlayerMatch => &mut self.player_matches,
        };
        *slot = rows;
    }

    pub fn total(&self) -> usize {
        self.tournaments
            + self.hands
            + self.countries
            + self.players
            + self.matches
            + self.match_stats
            + self.player_matches
    }
}

/// Loads a directory of CSV files into the database.
pub struct Loader {
    data_dir: PathBuf,
}

impl Loader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every file in order inside a single transaction.
    pub async fn load_all(&self, pool: &SqlitePool) -> Result<LoadSummary, IngestError> {
        for table in Table::ALL {
            let path = self.data_dir.join(csv_filename(table));
            if !path.is_file() {
                return Err(IngestError::MissingFile(path));
            }
        }

        info!("Loading CSV data from {}", self.data_dir.display());
        let mut summary = LoadSummary::default();
        let mut tx = pool.begin().await?;

        for table in Table::ALL {
            let rows = self.load_table(&mut tx, table, &mut summary).await?;
            info!("Loaded {} rows into {}", rows, table);
            summary.record(table, rows);
        }

        tx.commit().await?;
        info!("Load complete: {} rows", summary.total());
        if summary.unattributed_stats > 0 {
            warn!(
                "{} match stats rows have no -w/-l suffix and will not count toward ace totals",
                summary.unattributed_stats
            );
        }
        Ok(summary)
    }

    async fn load_table(
        &self,
        conn: &mut SqliteConnection,
        table: Table,
        summary: &mut LoadSummary,
    ) -> Result<usize, IngestError> {
        let file = csv_filename(table);
        let path = self.data_dir.join(file);
        debug!("Reading {}", path.display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)?;

        let mut rows = 0;
        for result in reader.records() {
            let record = result?;
            let row = Row::new(file, &record);
            match table {
                Table::Tournament => load_tournament(conn, &row).await?,
                Table::Hand => load_hand(conn, &row).await?,
                Table::Country => load_country(conn, &row).await?,
                Table::Players => load_player(conn, &row).await?,
                Table::Matches => load_match(conn, &row).await?,
                Table::MatchStats => {
                    if !load_match_stats(conn, &row).await? {
                        summary.unattributed_stats += 1;
                    }
                }
                Table::PlayerMatch => load_player_match(conn, &row).await?,
            }
            rows += 1;
        }
        Ok(rows)
    }
}

/// Fail with `MissingReference` unless `key` exists in `table`.
async fn require(
    conn: &mut SqliteConnection,
    row: &Row<'_>,
    table: Table,
    key: &str,
) -> Result<(), IngestError> {
    if records::exists(&mut *conn, table, key).await? {
        Ok(())
    } else {
        Err(IngestError::MissingReference {
            file: row.file(),
            line: row.line(),
            table,
            key: key.to_string(),
        })
    }
}

async fn load_tournament(conn: &mut SqliteConnection, row: &Row<'_>) -> Result<(), IngestError> {
    let tournament = Tournament {
        tourney_id: row.text(0, "tourney_id")?,
        tourney_name: row.text(1, "tourney_name")?,
        surface: row.opt_text(2, "surface")?,
        draw_size: row.opt_int(3, "draw_size")?,
        tourney_level: row.opt_text(4, "tourney_level")?,
        tourney_date: row.opt_date(5, "tourney_date")?,
    };
    records::insert_tournament(&mut *conn, &tournament).await?;
    Ok(())
}

async fn load_hand(conn: &mut SqliteConnection, row: &Row<'_>) -> Result<(), IngestError> {
    let hand = Hand {
        hand: row.text(0, "hand")?,
        hand_description: row.opt_text(1, "hand_description")?,
    };
    records::insert_hand(&mut *conn, &hand).await?;
    Ok(())
}

async fn load_country(conn: &mut SqliteConnection, row: &Row<'_>) -> Result<(), IngestError> {
    let country = Country {
        ioc: row.text(0, "ioc")?,
        country_name: row.opt_text(1, "country_name")?,
    };
    records::insert_country(&mut *conn, &country).await?;
    Ok(())
}

async fn load_player(conn: &mut SqliteConnection, row: &Row<'_>) -> Result<(), IngestError> {
    let player = Player {
        player_id: row.int(0, "player_id")?,
        player_name: row.text(1, "player_name")?,
        hand: row.text(2, "hand")?,
        height: row.opt_int(3, "height")?,
        ioc: row.text(4, "ioc")?,
    };
    require(conn, row, Table::Hand, &player.hand).await?;
    require(conn, row, Table::Country, &player.ioc).await?;
    records::insert_player(&mut *conn, &player).await?;
    Ok(())
}

async fn load_match(conn: &mut SqliteConnection, row: &Row<'_>) -> Result<(), IngestError> {
    let m = Match {
        match_id: row.text(0, "match_id")?,
        tourney_id: row.text(1, "tourney_id")?,
        match_num: row.opt_int(2, "match_num")?,
        score: row.opt_text(3, "score")?,
        best_of: row.opt_text(4, "best_of")?,
        round: row.opt_text(5, "round")?,
        minutes: row.opt_int(6, "minutes")?,
    };
    require(conn, row, Table::Tournament, &m.tourney_id).await?;
    records::insert_match(&mut *conn, &m).await?;
    Ok(())
}

/// Returns whether the stats id carries a side suffix.
async fn load_match_stats(conn: &mut SqliteConnection, row: &Row<'_>) -> Result<bool, IngestError> {
    let stats = MatchStats {
        match_stats_id: row.text(0, "match_stats_id")?,
        match_id: row.text(1, "match_id")?,
        ace: row.opt_int(2, "ace")?,
        df: row.opt_int(3, "df")?,
        svpt: row.opt_int(4, "svpt")?,
        first_in: row.opt_int(5, "firstIn")?,
        first_won: row.opt_int(6, "firstWon")?,
        second_won: row.opt_int(7, "secondWon")?,
        sv_gms: row.opt_int(8, "SvGms")?,
        bp_saved: row.opt_int(9, "bpSaved")?,
        bp_faced: row.opt_int(10, "bpFaced")?,
    };
    require(conn, row, Table::Matches, &stats.match_id).await?;
    records::insert_match_stats(&mut *conn, &stats).await?;

    let attributed = stats.side().is_some();
    if !attributed {
        debug!(
            "{}:{}: stats id '{}' has no side suffix",
            row.file(),
            row.line(),
            stats.match_stats_id
        );
    }
    Ok(attributed)
}

async fn load_player_match(conn: &mut SqliteConnection, row: &Row<'_>) -> Result<(), IngestError> {
    let pm = PlayerMatch {
        player_id: row.int(0, "player_id")?,
        match_id: row.text(1, "match_id")?,
        player_role: row.opt_role(2, "player_role")?,
        seed: row.opt_int(3, "seed")?,
        entry: row.opt_text(4, "entry")?,
        ranking: row.opt_int(5, "ranking")?,
        ranking_points: row.opt_int(6, "ranking_points")?,
        age: row.opt_int(7, "age")?,
    };
    require(conn, row, Table::Players, &pm.player_id.to_string()).await?;
    require(conn, row, Table::Matches, &pm.match_id).await?;
    records::insert_player_match(&mut *conn, &pm).await?;
    Ok(())
}
