//! Player create/read/update/delete.
//!
//! Hand and country arrive as free text and are resolved to lookup rows with
//! get-or-create on a derived key (see [`Hand::key_for`] and
//! [`Country::key_for`]). Every write runs in a single transaction.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::{Country, Hand, NewPlayer, Player, PlayerUpdate};

/// Get a single player by ID.
pub async fn get_player(pool: &SqlitePool, player_id: i64) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        "SELECT player_id, player_name, height, hand, ioc FROM tennis_players WHERE player_id = ?",
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

/// Resolve a hand description to its key, creating the row if absent.
///
/// An existing row wins even if its description differs from `description`.
pub async fn get_or_create_hand(
    conn: &mut SqliteConnection,
    description: &str,
) -> Result<String, StorageError> {
    let key = Hand::key_for(description).ok_or_else(|| StorageError::InvalidKey {
        field: "hand",
        value: description.to_string(),
    })?;
    let description = description.trim();

    let inserted = sqlx::query(
        "INSERT INTO tennis_hand (hand, hand_description) VALUES (?, ?)
         ON CONFLICT(hand) DO NOTHING",
    )
    .bind(&key)
    .bind(description)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if inserted > 0 {
        info!("Created hand {} ({})", key, description);
        return Ok(key);
    }

    let (existing,): (Option<String>,) =
        sqlx::query_as("SELECT hand_description FROM tennis_hand WHERE hand = ?")
            .bind(&key)
            .fetch_one(&mut *conn)
            .await?;
    if existing.as_deref() != Some(description) {
        warn!(
            "Hand description '{}' resolved to existing hand {} ({:?})",
            description, key, existing
        );
    }
    Ok(key)
}

/// Resolve a country name to its IOC key, creating the row if absent.
///
/// An existing row wins even if its name differs from `name`.
pub async fn get_or_create_country(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<String, StorageError> {
    let key = Country::key_for(name).ok_or_else(|| StorageError::InvalidKey {
        field: "ioc",
        value: name.to_string(),
    })?;
    let name = name.trim();

    let inserted = sqlx::query(
        "INSERT INTO tennis_country (ioc, country_name) VALUES (?, ?)
         ON CONFLICT(ioc) DO NOTHING",
    )
    .bind(&key)
    .bind(name)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if inserted > 0 {
        info!("Created country {} ({})", key, name);
        return Ok(key);
    }

    let (existing,): (Option<String>,) =
        sqlx::query_as("SELECT country_name FROM tennis_country WHERE ioc = ?")
            .bind(&key)
            .fetch_one(&mut *conn)
            .await?;
    if existing.as_deref() != Some(name) {
        warn!(
            "Country name '{}' resolved to existing country {} ({:?})",
            name, key, existing
        );
    }
    Ok(key)
}

/// Create a player. The new ID is one greater than the current maximum, or 1.
///
/// The ID is computed inside the INSERT itself, so two concurrent creates
/// cannot be handed the same ID.
pub async fn create_player(pool: &SqlitePool, new: &NewPlayer) -> Result<Player, StorageError> {
    let mut tx = pool.begin().await?;

    let hand = get_or_create_hand(&mut tx, &new.hand_description).await?;
    let ioc = get_or_create_country(&mut tx, &new.country_name).await?;

    let player = sqlx::query_as::<_, Player>(
        "INSERT INTO tennis_players (player_id, player_name, height, hand, ioc)
         SELECT COALESCE(MAX(player_id), 0) + 1, ?, ?, ?, ? FROM tennis_players
         RETURNING player_id, player_name, height, hand, ioc",
    )
    .bind(new.player_name.trim())
    .bind(new.height)
    .bind(&hand)
    .bind(&ioc)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Created player {} ({})", player.player_id, player.player_name);
    Ok(player)
}

/// Apply a partial update. Returns `None` if the player does not exist.
pub async fn update_player(
    pool: &SqlitePool,
    player_id: i64,
    update: &PlayerUpdate,
) -> Result<Option<Player>, StorageError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, Player>(
        "SELECT player_id, player_name, height, hand, ioc FROM tennis_players WHERE player_id = ?",
    )
    .bind(player_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(mut player) = existing else {
        return Ok(None);
    };
    if update.is_empty() {
        debug!("Empty update for player {}", player_id);
        return Ok(Some(player));
    }

    if let Some(desc) = &update.hand_description {
        player.hand = get_or_create_hand(&mut tx, desc).await?;
    }
    if let Some(name) = &update.country_name {
        player.ioc = get_or_create_country(&mut tx, name).await?;
    }
    if let Some(name) = &update.player_name {
        player.player_name = name.trim().to_string();
    }
    if let Some(height) = update.height {
        player.height = height;
    }

    sqlx::query(
        "UPDATE tennis_players SET player_name = ?, height = ?, hand = ?, ioc = ?
         WHERE player_id = ?",
    )
    .bind(&player.player_name)
    .bind(player.height)
    .bind(&player.hand)
    .bind(&player.ioc)
    .bind(player.player_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    debug!("Updated player {}", player.player_id);
    Ok(Some(player))
}

/// Delete a player. Returns `false` if no such player exists.
pub async fn delete_player(pool: &SqlitePool, player_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tennis_players WHERE player_id = ?")
        .bind(player_id)
        .execute(pool)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        info!("Deleted player {}", player_id);
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::records::{count_rows, list_countries, list_hands};
    use crate::storage::test_support::test_pool;
    use crate::storage::Table;
    use pretty_assertions::assert_eq;

    fn new_player(name: &str, hand: &str, country: &str) -> NewPlayer {
        NewPlayer {
            player_name: name.to_string(),
            height: Some(180),
            hand_description: hand.to_string(),
            country_name: country.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_player_gets_id_one() {
        let pool = test_pool().await;
        let player = create_player(&pool, &new_player("Player 1", "Right", "Canada"))
            .await
            .unwrap();

        assert_eq!(player.player_id, 1);
        assert_eq!(player.hand, "R");
        assert_eq!(player.ioc, "CAN");
        assert_eq!(player.height, Some(180));
    }

    #[tokio::test]
    async fn test_ids_follow_current_maximum() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO tennis_hand VALUES ('L', 'Left')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO tennis_country VALUES ('FIN', 'Finland')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO tennis_players VALUES (200000, 'Existing', NULL, 'L', 'FIN')")
            .execute(&pool)
            .await
            .unwrap();

        let player = create_player(&pool, &new_player("Next", "Left", "Finland"))
            .await
            .unwrap();
        assert_eq!(player.player_id, 200001);
    }

    #[tokio::test]
    async fn test_lookup_rows_created_once() {
        let pool = test_pool().await;
        create_player(&pool, &new_player("A", "Right", "Germany"))
            .await
            .unwrap();
        create_player(&pool, &new_player("B", "Right", "Germany"))
            .await
            .unwrap();

        assert_eq!(count_rows(&pool, Table::Hand).await.unwrap(), 1);
        assert_eq!(count_rows(&pool, Table::Country).await.unwrap(), 1);
        assert_eq!(count_rows(&pool, Table::Players).await.unwrap(), 2);

        let hands = list_hands(&pool).await.unwrap();
        assert_eq!(hands[0].hand_description.as_deref(), Some("Right"));
        let countries = list_countries(&pool).await.unwrap();
        assert_eq!(countries[0].ioc, "GER");
        assert_eq!(countries[0].country_name.as_deref(), Some("Germany"));
    }

    #[tokio::test]
    async fn test_prefix_collision_reuses_existing_row() {
        let pool = test_pool().await;
        create_player(&pool, &new_player("A", "Unknown", "Austria"))
            .await
            .unwrap();
        let b = create_player(&pool, &new_player("B", "Undecided", "Australia"))
            .await
            .unwrap();

        assert_eq!(b.hand, "U");
        assert_eq!(b.ioc, "AUS");
        let hands = list_hands(&pool).await.unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].hand_description.as_deref(), Some("Unknown"));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_omitted_fields() {
        let pool = test_pool().await;
        let created = create_player(&pool, &new_player("Player 1", "Left", "Finland"))
            .await
            .unwrap();

        let update = PlayerUpdate {
            player_name: Some("Updated Player Name".to_string()),
            ..PlayerUpdate::default()
        };
        let updated = update_player(&pool, created.player_id, &update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.player_name, "Updated Player Name");
        assert_eq!(updated.height, created.height);
        assert_eq!(updated.hand, created.hand);
        assert_eq!(updated.ioc, created.ioc);
        assert_eq!(
            get_player(&pool, created.player_id).await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn test_update_hand_country_and_clear_height() {
        let pool = test_pool().await;
        let created = create_player(&pool, &new_player("Player 1", "Left", "Finland"))
            .await
            .unwrap();

        let update = PlayerUpdate {
            height: Some(None),
            hand_description: Some("Right".to_string()),
            country_name: Some("Canada".to_string()),
            ..PlayerUpdate::default()
        };
        let updated = update_player(&pool, created.player_id, &update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.height, None);
        assert_eq!(updated.hand, "R");
        assert_eq!(updated.ioc, "CAN");
        assert_eq!(count_rows(&pool, Table::Hand).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_update_returns_player_unchanged() {
        let pool = test_pool().await;
        let created = create_player(&pool, &new_player("Player 1", "Left", "Finland"))
            .await
            .unwrap();

        let updated = update_player(&pool, created.player_id, &PlayerUpdate::default())
            .await
            .unwrap();
        assert_eq!(updated, Some(created));
    }

    #[tokio::test]
    async fn test_update_missing_player() {
        let pool = test_pool().await;
        let result = update_player(&pool, 42, &PlayerUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_player() {
        let pool = test_pool().await;
        let created = create_player(&pool, &new_player("Player 1", "Left", "Haiti"))
            .await
            .unwrap();

        assert!(delete_player(&pool, created.player_id).await.unwrap());
        assert!(get_player(&pool, created.player_id).await.unwrap().is_none());
        assert!(!delete_player(&pool, created.player_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let pool = test_pool().await;
        let result = create_player(&pool, &new_player("Player 1", " ", "Haiti")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey { field: "hand", .. })));
        assert_eq!(count_rows(&pool, Table::Country).await.unwrap(), 0);
    }
}
