//! SQLite schema definitions.
//!
//! Tables:
//! - tennis_tournament: Tournament editions
//! - tennis_hand: Dominant hand lookup
//! - tennis_country: Country lookup keyed by IOC code
//! - tennis_players: Players, referencing hand and country
//! - tennis_matches: Matches, referencing their tournament
//! - tennis_matchstats: Per-side serve statistics of a match
//! - tennis_playermatch: Player participation in a match

use sqlx::SqlitePool;
use tracing::debug;

const DDL: [&str; 9] = [
    r#"
    CREATE TABLE IF NOT EXISTS tennis_tournament (
        tourney_id TEXT PRIMARY KEY,
        tourney_name TEXT NOT NULL,
        surface TEXT,
        draw_size INTEGER,
        tourney_level TEXT,
        tourney_date TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tennis_hand (
        hand TEXT PRIMARY KEY,
        hand_description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tennis_country (
        ioc TEXT PRIMARY KEY,
        country_name TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tennis_players (
        player_id INTEGER PRIMARY KEY,
        player_name TEXT NOT NULL,
        height INTEGER,
        hand TEXT NOT NULL REFERENCES tennis_hand(hand) ON DELETE CASCADE,
        ioc TEXT NOT NULL REFERENCES tennis_country(ioc) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tennis_matches (
        match_id TEXT PRIMARY KEY,
        tourney_id TEXT NOT NULL REFERENCES tennis_tournament(tourney_id) ON DELETE CASCADE,
        match_num INTEGER,
        score TEXT,
        best_of TEXT,
        round TEXT,
        minutes INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tennis_matchstats (
        match_stats_id TEXT PRIMARY KEY,
        match_id TEXT NOT NULL REFERENCES tennis_matches(match_id) ON DELETE CASCADE,
        ace INTEGER,
        df INTEGER,
        svpt INTEGER,
        first_in INTEGER,
        first_won INTEGER,
        second_won INTEGER,
        sv_gms INTEGER,
        bp_saved INTEGER,
        bp_faced INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tennis_playermatch (
        player_id INTEGER NOT NULL REFERENCES tennis_players(player_id) ON DELETE CASCADE,
        match_id TEXT NOT NULL REFERENCES tennis_matches(match_id) ON DELETE CASCADE,
        player_role TEXT CHECK (player_role IN ('winner', 'loser')),
        seed INTEGER,
        entry TEXT,
        ranking INTEGER,
        ranking_points INTEGER,
        age INTEGER,
        PRIMARY KEY (player_id, match_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_playermatch_match ON tennis_playermatch(match_id)",
    "CREATE INDEX IF NOT EXISTS idx_matchstats_match ON tennis_matchstats(match_id)",
];

/// Create all tables if they don't exist.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("Schema ready");
    Ok(())
}
