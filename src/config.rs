use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Table options. Each toggle is independent.
///
/// `sound_enabled`, `animations_enabled` and `show_legality_hints` are read
/// by the presentation only; the engine carries them so a single value can
/// be loaded and handed around.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    pub sound_enabled: bool,
    pub animations_enabled: bool,
    /// Play a freshly drawn card immediately when it is legal.
    pub auto_play_drawn_card: bool,
    /// Allow +2 and +4 to be combined within one accumulation.
    pub mix_stacking_allowed: bool,
    /// Penalize two cards when a player reaches one card without declaring UNO.
    pub uno_declaration_required: bool,
    pub show_legality_hints: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            animations_enabled: true,
            auto_play_drawn_card: true,
            mix_stacking_allowed: true,
            uno_declaration_required: false,
            show_legality_hints: false,
        }
    }
}

impl GameOptions {
    /// Reads options from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(text)?)
    }
}
