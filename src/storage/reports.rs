//! Aggregation reports over the tennis tables.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::Player;

/// Number of rows returned by the leaderboard reports.
pub const LEADERBOARD_SIZE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TournamentName {
    pub tourney_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TournamentYear {
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterCount {
    pub letter: char,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AceLeader {
    pub player_name: String,
    pub total_aces: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CountryWins {
    pub country_name: Option<String>,
    pub wins: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct HandPerformance {
    pub hand_description: Option<String>,
    pub wins: i64,
    pub losses: i64,
}

/// Distinct tournament names.
pub async fn tournament_names(pool: &SqlitePool) -> Result<Vec<TournamentName>, sqlx::Error> {
    sqlx::query_as::<_, TournamentName>(
        "SELECT DISTINCT tourney_name FROM tennis_tournament ORDER BY tourney_name",
    )
    .fetch_all(pool)
    .await
}

/// Distinct tournament years, ascending. Undated tournaments are skipped.
pub async fn tournament_years(pool: &SqlitePool) -> Result<Vec<TournamentYear>, sqlx::Error> {
    sqlx::query_as::<_, TournamentYear>(
        "SELECT DISTINCT substr(tourney_date, 1, 4) AS year
         FROM tennis_tournament
         WHERE tourney_date IS NOT NULL
         ORDER BY year",
    )
    .fetch_all(pool)
    .await
}

/// Player counts by the first letter of the stored name, for every letter A to Z.
///
/// Matching is case-sensitive: a name stored as "de Minaur" is not counted under D.
pub async fn players_per_letter(pool: &SqlitePool) -> Result<Vec<LetterCount>, sqlx::Error> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT substr(player_name, 1, 1) AS letter, COUNT(*) AS count
         FROM tennis_players
         GROUP BY letter",
    )
    .fetch_all(pool)
    .await?;

    Ok(('A'..='Z')
        .map(|letter| {
            let count = rows
                .iter()
                .find(|(first, _)| first.chars().eq(std::iter::once(letter)))
                .map(|(_, count)| *count)
                .unwrap_or(0);
            LetterCount { letter, count }
        })
        .collect())
}

/// Players whose name starts with `prefix`, ignoring case, by name.
///
/// `prefix` must already be uppercase.
pub async fn players_starting_with(
    pool: &SqlitePool,
    prefix: &str,
) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        "SELECT player_id, player_name, height, hand, ioc
         FROM tennis_players
         WHERE upper(substr(player_name, 1, length(?))) = ?
         ORDER BY player_name, player_id",
    )
    .bind(prefix)
    .bind(prefix)
    .fetch_all(pool)
    .await
}

/// Top players by total aces.
///
/// A stats row counts toward a player only when its id suffix matches the
/// player's role in that match: `-w` rows for the winner, `-l` rows for the
/// loser. Ties are ordered by player id.
pub async fn most_aces(pool: &SqlitePool) -> Result<Vec<AceLeader>, sqlx::Error> {
    sqlx::query_as::<_, AceLeader>(
        "SELECT p.player_name AS player_name,
                COALESCE(SUM(CASE
                    WHEN pm.player_role = 'winner' AND substr(ms.match_stats_id, -2) = '-w'
                        THEN ms.ace
                    WHEN pm.player_role = 'loser' AND substr(ms.match_stats_id, -2) = '-l'
                        THEN ms.ace
                    ELSE 0
                END), 0) AS total_aces
         FROM tennis_players p
         LEFT JOIN tennis_playermatch pm ON pm.player_id = p.player_id
         LEFT JOIN tennis_matchstats ms ON ms.match_id = pm.match_id
         GROUP BY p.player_id
         ORDER BY total_aces DESC, p.player_id ASC
         LIMIT ?",
    )
    .bind(LEADERBOARD_SIZE)
    .fetch_all(pool)
    .await
}

/// Top countries by number of matches won by their players.
pub async fn most_wins_by_country(pool: &SqlitePool) -> Result<Vec<CountryWins>, sqlx::Error> {
    sqlx::query_as::<_, CountryWins>(
        "SELECT c.country_name AS country_name,
                COALESCE(SUM(CASE WHEN pm.player_role = 'winner' THEN 1 ELSE 0 END), 0) AS wins
         FROM tennis_playermatch pm
         JOIN tennis_players p ON p.player_id = pm.player_id
         JOIN tennis_country c ON c.ioc = p.ioc
         GROUP BY c.country_name
         ORDER BY wins DESC, c.country_name ASC
         LIMIT ?",
    )
    .bind(LEADERBOARD_SIZE)
    .fetch_all(pool)
    .await
}

/// Match wins and losses grouped by the players' dominant hand.
pub async fn performance_by_hand(pool: &SqlitePool) -> Result<Vec<HandPerformance>, sqlx::Error> {
    sqlx::query_as::<_, HandPerformance>(
        "SELECT h.hand_description AS hand_description,
                COALESCE(SUM(CASE WHEN pm.player_role = 'winner' THEN 1 ELSE 0 END), 0) AS wins,
                COALESCE(SUM(CASE WHEN pm.player_role = 'loser' THEN 1 ELSE 0 END), 0) AS losses
         FROM tennis_playermatch pm
         JOIN tennis_players p ON p.player_id = pm.player_id
         JOIN tennis_hand h ON h.hand = p.hand
         GROUP BY h.hand_description
         ORDER BY h.hand_description",
    )
    .fetch_all(pool)
    .await
}
