//! Per-table inserts, key lookups and full listings.
//!
//! Insert and lookup functions take any SQLite executor so the bulk loader
//! can run them inside its transaction.

use sqlx::{Executor, Sqlite, SqlitePool};

use super::Table;
use crate::models::{Country, Hand, Match, MatchStats, Player, PlayerMatch, Tournament};

impl Table {
    /// Column used for key lookups. For the composite player-match key this
    /// is its leading column.
    fn key_column(&self) -> &'static str {
        match self {
            Table::Tournament => "tourney_id",
            Table::Hand => "hand",
            Table::Country => "ioc",
            Table::Players => "player_id",
            Table::Matches => "match_id",
            Table::MatchStats => "match_stats_id",
            Table::PlayerMatch => "player_id",
        }
    }
}

/// Whether a row with the given key exists in `table`.
///
/// Keys are passed as text; SQLite applies numeric affinity when the key
/// column is an INTEGER.
pub async fn exists<'e, E>(executor: E, table: Table, key: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = ? LIMIT 1",
        table.name(),
        table.key_column()
    );
    let row: Option<(i64,)> = sqlx::query_as(&sql)
        .bind(key)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

/// Number of rows in `table`.
pub async fn count_rows(pool: &SqlitePool, table: Table) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(pool).await?;
    Ok(count)
}

pub async fn insert_tournament<'e, E>(executor: E, t: &Tournament) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO tennis_tournament
         (tourney_id, tourney_name, surface, draw_size, tourney_level, tourney_date)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&t.tourney_id)
    .bind(&t.tourney_name)
    .bind(&t.surface)
    .bind(t.draw_size)
    .bind(&t.tourney_level)
    .bind(t.tourney_date)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_hand<'e, E>(executor: E, hand: &Hand) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO tennis_hand (hand, hand_description) VALUES (?, ?)")
        .bind(&hand.hand)
        .bind(&hand.hand_description)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn insert_country<'e, E>(executor: E, country: &Country) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO tennis_country (ioc, country_name) VALUES (?, ?)")
        .bind(&country.ioc)
        .bind(&country.country_name)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn insert_player<'e, E>(executor: E, player: &Player) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO tennis_players (player_id, player_name, height, hand, ioc)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(player.player_id)
    .bind(&player.player_name)
    .bind(player.height)
    .bind(&player.hand)
    .bind(&player.ioc)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_match<'e, E>(executor: E, m: &Match) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO tennis_matches
         (match_id, tourney_id, match_num, score, best_of, round, minutes)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&m.match_id)
    .bind(&m.tourney_id)
    .bind(m.match_num)
    .bind(&m.score)
    .bind(&m.best_of)
    .bind(&m.round)
    .bind(m.minutes)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_match_stats<'e, E>(executor: E, s: &MatchStats) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO tennis_matchstats
         (match_stats_id, match_id, ace, df, svpt, first_in, first_won, second_won,
          sv_gms, bp_saved, bp_faced)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&s.match_stats_id)
    .bind(&s.match_id)
    .bind(s.ace)
    .bind(s.df)
    .bind(s.svpt)
    .bind(s.first_in)
    .bind(s.first_won)
    .bind(s.second_won)
    .bind(s.sv_gms)
    .bind(s.bp_saved)
    .bind(s.bp_faced)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_player_match<'e, E>(executor: E, pm: &PlayerMatch) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO tennis_playermatch
         (player_id, match_id, player_role, seed, entry, ranking, ranking_points, age)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(pm.player_id)
    .bind(&pm.match_id)
    .bind(pm.player_role)
    .bind(pm.seed)
    .bind(&pm.entry)
    .bind(pm.ranking)
    .bind(pm.ranking_points)
    .bind(pm.age)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn list_tournaments(pool: &SqlitePool) -> Result<Vec<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(
        "SELECT tourney_id, tourney_name, surface, draw_size, tourney_level, tourney_date
         FROM tennis_tournament ORDER BY tourney_id",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_hands(pool: &SqlitePool) -> Result<Vec<Hand>, sqlx::Error> {
    sqlx::query_as::<_, Hand>("SELECT hand, hand_description FROM tennis_hand ORDER BY hand")
        .fetch_all(pool)
        .await
}

pub async fn list_countries(pool: &SqlitePool) -> Result<Vec<Country>, sqlx::Error> {
    sqlx::query_as::<_, Country>("SELECT ioc, country_name FROM tennis_country ORDER BY ioc")
        .fetch_all(pool)
        .await
}

pub async fn list_players(pool: &SqlitePool) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        "SELECT player_id, player_name, height, hand, ioc FROM tennis_players ORDER BY player_id",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_matches(pool: &SqlitePool) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        "SELECT match_id, tourney_id, match_num, score, best_of, round, minutes
         FROM tennis_matches ORDER BY match_id",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_match_stats(pool: &SqlitePool) -> Result<Vec<MatchStats>, sqlx::Error> {
    sqlx::query_as::<_, MatchStats>(
        "SELECT match_stats_id, match_id, ace, df, svpt, first_in, first_won, second_won,
                sv_gms, bp_saved, bp_faced
         FROM tennis_matchstats ORDER BY match_stats_id",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_player_matches(pool: &SqlitePool) -> Result<Vec<PlayerMatch>, sqlx::Error> {
    sqlx::query_as::<_, PlayerMatch>(
        "SELECT player_id, match_id, player_role, seed, entry, ranking, ranking_points, age
         FROM tennis_playermatch ORDER BY match_id, player_id",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerRole;
    use crate::storage::test_support::test_pool;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn tournament() -> Tournament {
        Tournament {
            tourney_id: "T1".to_string(),
            tourney_name: "Test Open".to_string(),
            surface: Some("Hard".to_string()),
            draw_size: Some(32),
            tourney_level: Some("ATP".to_string()),
            tourney_date: NaiveDate::from_ymd_opt(2023, 1, 1),
        }
    }

    #[tokio::test]
    async fn test_tournament_roundtrip_keeps_date() {
        let pool = test_pool().await;
        insert_tournament(&pool, &tournament()).await.unwrap();

        let stored = list_tournaments(&pool).await.unwrap();
        assert_eq!(stored, vec![tournament()]);
    }

    #[tokio::test]
    async fn test_exists() {
        let pool = test_pool().await;
        insert_tournament(&pool, &tournament()).await.unwrap();

        assert!(exists(&pool, Table::Tournament, "T1").await.unwrap());
        assert!(!exists(&pool, Table::Tournament, "T2").await.unwrap());
        assert!(!exists(&pool, Table::Players, "1").await.unwrap());
    }

    #[tokio::test]
    async fn test_player_match_role_roundtrip() {
        let pool = test_pool().await;
        insert_tournament(&pool, &tournament()).await.unwrap();
        insert_hand(
            &pool,
            &Hand {
                hand: "R".to_string(),
                hand_description: Some("Right".to_string()),
            },
        )
        .await
        .unwrap();
        insert_country(
            &pool,
            &Country {
                ioc: "SRB".to_string(),
                country_name: Some("Serbia".to_string()),
            },
        )
        .await
        .unwrap();
        insert_player(
            &pool,
            &Player {
                player_id: 104925,
                player_name: "Novak Djokovic".to_string(),
                height: Some(188),
                hand: "R".to_string(),
                ioc: "SRB".to_string(),
            },
        )
        .await
        .unwrap();
        insert_match(
            &pool,
            &Match {
                match_id: "T1-001".to_string(),
                tourney_id: "T1".to_string(),
                match_num: Some(1),
                score: Some("6-4 6-4".to_string()),
                best_of: Some("3".to_string()),
                round: Some("F".to_string()),
                minutes: None,
            },
        )
        .await
        .unwrap();
        let pm = PlayerMatch {
            player_id: 104925,
            match_id: "T1-001".to_string(),
            player_role: Some(PlayerRole::Winner),
            seed: Some(1),
            entry: None,
            ranking: Some(1),
            ranking_points: Some(11000),
            age: Some(35),
        };
        insert_player_match(&pool, &pm).await.unwrap();

        assert!(exists(&pool, Table::Players, "104925").await.unwrap());
        assert_eq!(list_player_matches(&pool).await.unwrap(), vec![pm]);
        assert_eq!(count_rows(&pool, Table::PlayerMatch).await.unwrap(), 1);
    }
}
