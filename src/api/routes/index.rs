use std::fmt::Display;
use std::fmt::Write;

use axum::extract::State;
use axum::response::Html;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::storage::records;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn cell<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| escape(&v.to_string()))
        .unwrap_or_default()
}

/// Append one `<table>` with a heading, a header row and the given rows.
fn section(html: &mut String, title: &str, headers: &[&str], rows: Vec<Vec<String>>) {
    let _ = write!(html, "<h2>{}</h2>\n<table>\n<tr>", title);
    for header in headers {
        let _ = write!(html, "<th>{}</th>", header);
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str("<tr>");
        for value in row {
            let _ = write!(html, "<td>{}</td>", value);
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

/// Dump every table as HTML.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let pool = &state.pool;
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Grand Slams</title></head>\n<body>\n<h1>Grand Slams</h1>\n",
    );

    let tournaments = records::list_tournaments(pool).await?;
    section(
        &mut html,
        "Tournaments",
        &["ID", "Name", "Surface", "Draw size", "Level", "Date"],
        tournaments
            .iter()
            .map(|t| {
                vec![
                    escape(&t.tourney_id),
                    escape(&t.tourney_name),
                    cell(&t.surface),
                    cell(&t.draw_size),
                    cell(&t.tourney_level),
                    cell(&t.tourney_date),
                ]
            })
            .collect(),
    );

    let hands = records::list_hands(pool).await?;
    section(
        &mut html,
        "Hands",
        &["Hand", "Description"],
        hands
            .iter()
            .map(|h| vec![escape(&h.hand), cell(&h.hand_description)])
            .collect(),
    );

    let countries = records::list_countries(pool).await?;
    section(
        &mut html,
        "Countries",
        &["IOC", "Name"],
        countries
            .iter()
            .map(|c| vec![escape(&c.ioc), cell(&c.country_name)])
            .collect(),
    );

    let players = records::list_players(pool).await?;
    section(
        &mut html,
        "Players",
        &["ID", "Name", "Height", "Hand", "IOC"],
        players
            .iter()
            .map(|p| {
                vec![
                    p.player_id.to_string(),
                    escape(&p.player_name),
                    cell(&p.height),
                    escape(&p.hand),
                    escape(&p.ioc),
                ]
            })
            .collect(),
    );

    let matches = records::list_matches(pool).await?;
    section(
        &mut html,
        "Matches",
        &["ID", "Tournament", "Number", "Score", "Best of", "Round", "Minutes"],
        matches
            .iter()
            .map(|m| {
                vec![
                    escape(&m.match_id),
                    escape(&m.tourney_id),
                    cell(&m.match_num),
                    cell(&m.score),
                    cell(&m.best_of),
                    cell(&m.round),
                    cell(&m.minutes),
                ]
            })
            .collect(),
    );

    let stats = records::list_match_stats(pool).await?;
    section(
        &mut html,
        "Match stats",
        &[
            "ID", "Match", "Aces", "DF", "Serve pts", "1st in", "1st won", "2nd won",
            "Serve games", "BP saved", "BP faced",
        ],
        stats
            .iter()
            .map(|s| {
                vec![
                    escape(&s.match_stats_id),
                    escape(&s.match_id),
                    cell(&s.ace),
                    cell(&s.df),
                    cell(&s.svpt),
                    cell(&s.first_in),
                    cell(&s.first_won),
                    cell(&s.second_won),
                    cell(&s.sv_gms),
                    cell(&s.bp_saved),
                    cell(&s.bp_faced),
                ]
            })
            .collect(),
    );

    let player_matches = records::list_player_matches(pool).await?;
    section(
        &mut html,
        "Player matches",
        &["Player", "Match", "Role", "Seed", "Entry", "Ranking", "Points", "Age"],
        player_matches
            .iter()
            .map(|pm| {
                vec![
                    pm.player_id.to_string(),
                    escape(&pm.match_id),
                    cell(&pm.player_role),
                    cell(&pm.seed),
                    cell(&pm.entry),
                    cell(&pm.ranking),
                    cell(&pm.ranking_points),
                    cell(&pm.age),
                ]
            })
            .collect(),
    );

    html.push_str("</body>\n</html>\n");
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_app;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    async fn get_html(app: axum::Router) -> (StatusCode, Option<String>, String) {
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<b>Tom & \"Jerry\"</b>"),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn test_index_empty_database() {
        let (app, _pool) = test_app().await;

        let (status, content_type, body) = get_html(app).await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("<h2>Tournaments</h2>"));
        assert!(body.contains("<h2>Player matches</h2>"));
    }

    #[tokio::test]
    async fn test_index_lists_rows_escaped() {
        let (app, pool) = test_app().await;
        for sql in [
            "INSERT INTO tennis_hand VALUES ('R', 'Right')",
            "INSERT INTO tennis_country VALUES ('SUI', 'Switzerland')",
            "INSERT INTO tennis_players VALUES (1, 'Roger <Federer>', 185, 'R', 'SUI')",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }

        let (_, _, body) = get_html(app).await;
        assert!(body.contains("<td>Roger &lt;Federer&gt;</td>"));
        assert!(body.contains("<td>Switzerland</td>"));
        assert!(!body.contains("<Federer>"));
    }
}
