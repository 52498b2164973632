//! # Save Blob
//!
//! Player state, inventory and world clock as one JSON document.
//!
//! Chunks are never saved: the world regenerates from its seed. A blob only
//! restores who the player is, what they carry and what time it is.

use std::path::Path;

use serde::{Deserialize, Serialize};
use terracube_shared::{Vec3, WorldError, WorldResult};
use tracing::info;

use crate::inventory::{Inventory, HOTBAR_SLOTS};

/// Ticks in one full day.
pub const DAY_LENGTH_TICKS: u32 = 24_000;

/// Time of day a new world starts at (morning).
pub const START_TIME: u32 = 6_000;

/// Full health and hunger.
pub const MAX_VITALS: f32 = 20.0;

/// Where a new player spawns.
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 65.0, 0.0);

/// Game rules the player is under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Health, hunger and finite items.
    #[default]
    Survival,
    /// Unlimited building.
    Creative,
    /// Blocks cannot be changed freely.
    Adventure,
}

/// Sky state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    /// No precipitation.
    #[default]
    Clear,
    /// Rain.
    Rain,
    /// Rain with thunder.
    Storm,
}

/// Player body state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Feet position in world space.
    pub position: Vec3,
    /// `[pitch, yaw]` in radians.
    pub rotation: [f32; 2],
    /// Health points (0-20).
    pub health: f32,
    /// Hunger points (0-20).
    pub hunger: f32,
    /// Experience points.
    pub experience: u32,
    /// Active game mode.
    pub game_mode: GameMode,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: SPAWN_POSITION,
            rotation: [0.0, 0.0],
            health: MAX_VITALS,
            hunger: MAX_VITALS,
            experience: 0,
            game_mode: GameMode::Survival,
        }
    }
}

/// Everything persisted for one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlob {
    /// Player body state.
    pub player: PlayerState,
    /// Carried items.
    pub inventory: Inventory,
    /// Selected hotbar slot (0-8).
    pub selected_slot: usize,
    /// Time of day in ticks (0-23999).
    pub time: u32,
    /// Sky state.
    pub weather: Weather,
}

impl Default for SaveBlob {
    fn default() -> Self {
        Self {
            player: PlayerState::default(),
            inventory: Inventory::starter(),
            selected_slot: 0,
            time: START_TIME,
            weather: Weather::Clear,
        }
    }
}

impl SaveBlob {
    /// Serializes to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSave`] if serialization fails.
    pub fn to_json(&self) -> WorldResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WorldError::InvalidSave(e.to_string()))
    }

    /// Parses and validates a JSON blob.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSave`] for malformed JSON, a wrong slot
    /// count, an overfull stack, a selected slot outside the hotbar, a time
    /// outside one day or non-finite vitals.
    pub fn from_json(json: &str) -> WorldResult<Self> {
        let blob: Self =
            serde_json::from_str(json).map_err(|e| WorldError::InvalidSave(e.to_string()))?;
        blob.validate()?;
        Ok(blob)
    }

    /// Checks ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSave`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        if self.selected_slot >= HOTBAR_SLOTS {
            return Err(WorldError::InvalidSave(format!(
                "selectedSlot {} is outside the hotbar",
                self.selected_slot
            )));
        }
        if self.time >= DAY_LENGTH_TICKS {
            return Err(WorldError::InvalidSave(format!(
                "time {} is outside 0..{DAY_LENGTH_TICKS}",
                self.time
            )));
        }
        let p = &self.player;
        let numbers = [p.position.x, p.position.y, p.position.z, p.health, p.hunger];
        if numbers.iter().any(|v| !v.is_finite()) {
            return Err(WorldError::InvalidSave("player state is not finite".to_string()));
        }
        Ok(())
    }

    /// Writes the blob to a file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> WorldResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| WorldError::io(path, &e))?;
        info!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Reads a blob from a file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be read and
    /// [`WorldError::InvalidSave`] if it does not parse.
    pub fn load(path: &Path) -> WorldResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| WorldError::io(path, &e))?;
        let blob = Self::from_json(&json)?;
        info!(path = %path.display(), "game loaded");
        Ok(blob)
    }
}

/// Advances a clock by `ticks`, wrapping at one day.
#[inline]
#[must_use]
pub const fn advance_time(time: u32, ticks: u32) -> u32 {
    ((time as u64 + ticks as u64) % DAY_LENGTH_TICKS as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blob() {
        let blob = SaveBlob::default();
        assert_eq!(blob.player.position, SPAWN_POSITION);
        assert_eq!(blob.player.health, 20.0);
        assert_eq!(blob.time, 6_000);
        assert_eq!(blob.weather, Weather::Clear);
        assert!(blob.validate().is_ok());
    }

    #[test]
    fn test_json_field_names() {
        let json = SaveBlob::default().to_json().unwrap();
        assert!(json.contains("\"selectedSlot\""));
        assert!(json.contains("\"gameMode\": \"survival\""));
        assert!(json.contains("\"itemId\": \"dirt\""));
        assert!(json.contains("\"weather\": \"clear\""));
        assert!(!json.contains("chunks"));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let mut blob = SaveBlob::default();
        blob.selected_slot = 9;
        assert!(matches!(blob.validate(), Err(WorldError::InvalidSave(_))));

        let mut blob = SaveBlob::default();
        blob.time = DAY_LENGTH_TICKS;
        assert!(blob.validate().is_err());

        let mut blob = SaveBlob::default();
        blob.player.health = f32::NAN;
        assert!(blob.validate().is_err());
    }

    #[test]
    fn test_rejects_short_inventory() {
        let mut value = serde_json::to_value(SaveBlob::default()).unwrap();
        value["inventory"].as_array_mut().unwrap().pop();
        let err = SaveBlob::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, WorldError::InvalidSave(_)));
    }

    #[test]
    fn test_advance_time_wraps() {
        assert_eq!(advance_time(6_000, 20), 6_020);
        assert_eq!(advance_time(23_990, 20), 10);
        assert_eq!(advance_time(0, u32::MAX), u32::MAX % DAY_LENGTH_TICKS);
    }
}
