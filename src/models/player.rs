//! Player model and write-side validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest accepted player name.
pub const MAX_NAME_LEN: usize = 100;

/// Upper bound for a plausible height in centimetres.
pub const MAX_HEIGHT_CM: i64 = 300;

/// A player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub player_id: i64,

    pub player_name: String,

    /// Height in centimetres
    pub height: Option<i64>,

    /// Key into the hand table
    pub hand: String,

    /// Key into the country table
    pub ioc: String,
}

/// Validation failures keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when no errors were recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

fn check_name(name: &str, errors: &mut FieldErrors) {
    if name.trim().is_empty() {
        errors.add("player_name", "This field may not be blank.");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add(
            "player_name",
            format!("Ensure this field has no more than {} characters.", MAX_NAME_LEN),
        );
    }
}

fn check_height(height: Option<i64>, errors: &mut FieldErrors) {
    if let Some(h) = height {
        if !(0..=MAX_HEIGHT_CM).contains(&h) {
            errors.add(
                "height",
                format!("Height must be between 0 and {}.", MAX_HEIGHT_CM),
            );
        }
    }
}

fn check_not_blank(field: &str, value: &str, errors: &mut FieldErrors) {
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
    }
}

/// Input for creating a player.
///
/// Hand and country arrive as free text and are resolved to lookup keys on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub player_name: String,
    pub height: Option<i64>,
    pub hand_description: String,
    pub country_name: String,
}

impl NewPlayer {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&self.player_name, &mut errors);
        check_height(self.height, &mut errors);
        check_not_blank("hand_description", &self.hand_description, &mut errors);
        check_not_blank("country_name", &self.country_name, &mut errors);
        errors.into_result()
    }
}

/// Partial update of a player. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub player_name: Option<String>,
    /// `Some(None)` clears the height
    pub height: Option<Option<i64>>,
    pub hand_description: Option<String>,
    pub country_name: Option<String>,
}

impl PlayerUpdate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.player_name {
            check_name(name, &mut errors);
        }
        if let Some(height) = self.height {
            check_height(height, &mut errors);
        }
        if let Some(desc) = &self.hand_description {
            check_not_blank("hand_description", desc, &mut errors);
        }
        if let Some(name) = &self.country_name {
            check_not_blank("country_name", name, &mut errors);
        }
        errors.into_result()
    }

    pub fn is_empty(&self) -> bool {
        self.player_name.is_none()
            && self.height.is_none()
            && self.hand_description.is_none()
            && self.country_name.is_none()
    }
}
