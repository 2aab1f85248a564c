use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{FieldErrors, NewPlayer, Player, PlayerUpdate};
use crate::storage::players;

const REQUIRED: &str = "This field is required.";

/// Height as submitted: a JSON number, or a numeric string from a form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeightInput {
    Number(i64),
    Text(String),
}

impl HeightInput {
    /// Blank text means no height.
    fn parse(&self, errors: &mut FieldErrors) -> Option<i64> {
        match self {
            HeightInput::Number(n) => Some(*n),
            HeightInput::Text(s) if s.trim().is_empty() => None,
            HeightInput::Text(s) => match s.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.add("height", "A valid integer is required.");
                    None
                }
            },
        }
    }
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    #[serde(alias = "player_name")]
    pub fullname: Option<String>,
    #[serde(alias = "country_name")]
    pub country: Option<String>,
    pub height: Option<HeightInput>,
    #[serde(alias = "hand_description")]
    pub hand: Option<String>,
}

impl CreatePlayerRequest {
    pub fn into_new_player(self) -> Result<NewPlayer, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.fullname.is_none() {
            errors.add("player_name", REQUIRED);
        }
        if self.country.is_none() {
            errors.add("country_name", REQUIRED);
        }
        if self.hand.is_none() {
            errors.add("hand_description", REQUIRED);
        }
        let height = self.height.as_ref().and_then(|h| h.parse(&mut errors));

        let new = NewPlayer {
            player_name: self.fullname.unwrap_or_default(),
            height,
            hand_description: self.hand.unwrap_or_default(),
            country_name: self.country.unwrap_or_default(),
        };
        // Only report blank-field errors for fields that were actually sent.
        if let Err(more) = new.validate() {
            for field in ["player_name", "country_name", "hand_description", "height"] {
                if errors.get(field).is_none() {
                    if let Some(messages) = more.get(field) {
                        for message in messages {
                            errors.add(field, message.clone());
                        }
                    }
                }
            }
        }

        errors.into_result().map(|()| new)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    #[serde(alias = "fullname")]
    pub player_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub height: Option<Option<HeightInput>>,
    #[serde(alias = "hand")]
    pub hand_description: Option<String>,
    #[serde(alias = "country")]
    pub country_name: Option<String>,
}

impl UpdatePlayerRequest {
    pub fn into_update(self) -> Result<PlayerUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let height = self
            .height
            .map(|h| h.as_ref().and_then(|h| h.parse(&mut errors)));

        let update = PlayerUpdate {
            player_name: self.player_name,
            height,
            hand_description: self.hand_description,
            country_name: self.country_name,
        };
        if let Err(more) = update.validate() {
            errors.merge(more);
        }
        errors.into_result().map(|()| update)
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse<T> {
    pub status: &'static str,
    pub message: &'static str,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct CreatedPlayer {
    pub player: Player,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn create_player(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerResponse<CreatedPlayer>>), ApiError> {
    let request = json_body(payload)?;
    let new = request.into_new_player().map_err(ApiError::Validation)?;

    let player = players::create_player(&state.pool, &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(PlayerResponse {
            status: "success",
            message: "Player added successfully",
            data: CreatedPlayer { player },
        }),
    ))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if players::delete_player(&state.pool, player_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Player not found".to_string()))
    }
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
    payload: Result<Json<UpdatePlayerRequest>, JsonRejection>,
) -> Result<Json<PlayerResponse<Player>>, ApiError> {
    if players::get_player(&state.pool, player_id).await?.is_none() {
        return Err(ApiError::NotFound("Player not found".to_string()));
    }

    let request = json_body(payload)?;
    let update = request.into_update().map_err(ApiError::Validation)?;

    let player = players::update_player(&state.pool, player_id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    Ok(Json(PlayerResponse {
        status: "success",
        message: "Player updated successfully",
        data: player,
    }))
}
