use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Player;
use crate::storage::reports::{
    self, AceLeader, CountryWins, HandPerformance, LetterCount, TournamentName, TournamentYear,
};

pub async fn tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<TournamentName>>, ApiError> {
    Ok(Json(reports::tournament_names(&state.pool).await?))
}

pub async fn years(State(state): State<AppState>) -> Result<Json<Vec<TournamentYear>>, ApiError> {
    Ok(Json(reports::tournament_years(&state.pool).await?))
}

pub async fn players_per_letter(
    State(state): State<AppState>,
) -> Result<Json<Vec<LetterCount>>, ApiError> {
    Ok(Json(reports::players_per_letter(&state.pool).await?))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlayersByLetterResponse {
    Players(Vec<Player>),
    Empty { message: String },
}

pub async fn players_by_letter(
    State(state): State<AppState>,
    Path(letter): Path<String>,
) -> Result<Json<PlayersByLetterResponse>, ApiError> {
    let letter = letter.trim().to_uppercase();
    if letter.is_empty() {
        return Err(ApiError::BadRequest("letter must not be empty".to_string()));
    }

    let players = reports::players_starting_with(&state.pool, &letter).await?;
    if players.is_empty() {
        return Ok(Json(PlayersByLetterResponse::Empty {
            message: format!(
                "There aren't any players with names starting with the letter {}",
                letter
            ),
        }));
    }
    Ok(Json(PlayersByLetterResponse::Players(players)))
}

pub async fn most_aces(State(state): State<AppState>) -> Result<Json<Vec<AceLeader>>, ApiError> {
    Ok(Json(reports::most_aces(&state.pool).await?))
}

pub async fn countries_with_most_wins(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountryWins>>, ApiError> {
    Ok(Json(reports::most_wins_by_country(&state.pool).await?))
}

pub async fn performance_by_hand(
    State(state): State<AppState>,
) -> Result<Json<Vec<HandPerformance>>, ApiError> {
    Ok(Json(reports::performance_by_hand(&state.pool).await?))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get_json, test_app};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sqlx::SqlitePool;

    async fn seed(pool: &SqlitePool) {
        for sql in [
            "INSERT INTO tennis_tournament VALUES ('2019-540', 'Wimbledon', 'Grass', 128, 'G', '2019-07-01')",
            "INSERT INTO tennis_tournament VALUES ('2017-540', 'Wimbledon', 'Grass', 128, 'G', '2017-07-03')",
            "INSERT INTO tennis_hand VALUES ('R', 'Right'), ('L', 'Left')",
            "INSERT INTO tennis_country VALUES ('SUI', 'Switzerland'), ('ESP', 'Spain')",
            "INSERT INTO tennis_players VALUES (103819, 'Roger Federer', 185, 'R', 'SUI')",
            "INSERT INTO tennis_players VALUES (104745, 'Rafael Nadal', 185, 'L', 'ESP')",
            "INSERT INTO tennis_matches (match_id, tourney_id) VALUES ('2019-540-SF', '2019-540')",
            "INSERT INTO tennis_matchstats (match_stats_id, match_id, ace) VALUES ('2019-540-SF-w', '2019-540-SF', 14)",
            "INSERT INTO tennis_matchstats (match_stats_id, match_id, ace) VALUES ('2019-540-SF-l', '2019-540-SF', 3)",
            "INSERT INTO tennis_playermatch (player_id, match_id, player_role) VALUES (103819, '2019-540-SF', 'winner')",
            "INSERT INTO tennis_playermatch (player_id, match_id, player_role) VALUES (104745, '2019-540-SF', 'loser')",
        ] {
            sqlx::query(sql).execute(pool).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_tournaments_endpoint() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/tournaments/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([{ "tourney_name": "Wimbledon" }]));
    }

    #[tokio::test]
    async fn test_years_endpoint() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/years/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([{ "year": "2017" }, { "year": "2019" }]));
    }

    #[tokio::test]
    async fn test_players_histogram_endpoint() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/players/").await;
        assert_eq!(status, StatusCode::OK);
        let buckets = json.as_array().unwrap();
        assert_eq!(buckets.len(), 26);
        assert_eq!(buckets[0], json!({ "letter": "A", "count": 0 }));
        assert_eq!(buckets[17], json!({ "letter": "R", "count": 2 }));
    }

    #[tokio::test]
    async fn test_players_by_letter_lowercase_input() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/players/by-letter/r/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([
                { "player_id": 104745, "player_name": "Rafael Nadal", "height": 185, "hand": "L", "ioc": "ESP" },
                { "player_id": 103819, "player_name": "Roger Federer", "height": 185, "hand": "R", "ioc": "SUI" },
            ])
        );
    }

    #[tokio::test]
    async fn test_players_by_letter_matches_lowercase_names() {
        let (app, pool) = test_app().await;
        seed(&pool).await;
        sqlx::query("INSERT INTO tennis_players VALUES (1, 'rafa lowercase', NULL, 'L', 'ESP')")
            .execute(&pool)
            .await
            .unwrap();

        let (status, json) = get_json(app, "/api/players/by-letter/r/").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["player_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Rafael Nadal", "Roger Federer", "rafa lowercase"]);
    }

    #[tokio::test]
    async fn test_players_by_letter_no_match_returns_message() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/players/by-letter/q/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({ "message": "There aren't any players with names starting with the letter Q" })
        );
    }

    #[tokio::test]
    async fn test_most_aces_endpoint() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/players/most-aces/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([
                { "player_name": "Roger Federer", "total_aces": 14 },
                { "player_name": "Rafael Nadal", "total_aces": 3 },
            ])
        );
    }

    #[tokio::test]
    async fn test_countries_with_most_wins_endpoint() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/countries/most-wins/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([
                { "country_name": "Switzerland", "wins": 1 },
                { "country_name": "Spain", "wins": 0 },
            ])
        );
    }

    #[tokio::test]
    async fn test_performance_by_hand_endpoint() {
        let (app, pool) = test_app().await;
        seed(&pool).await;

        let (status, json) = get_json(app, "/api/performance-by-hand/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([
                { "hand_description": "Left", "wins": 0, "losses": 1 },
                { "hand_description": "Right", "wins": 1, "losses": 0 },
            ])
        );
    }

    #[tokio::test]
    async fn test_reports_on_empty_database() {
        let (app, _pool) = test_app().await;

        let (status, json) = get_json(app.clone(), "/api/tournaments/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));

        let (status, json) = get_json(app, "/api/players/most-aces/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }
}
