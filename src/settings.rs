//! Game settings and tuning
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::pool::typeable_words;

/// Words are duplicated on purpose so combos show up often.
pub const DEFAULT_WORDS: &[&str] = &[
    "hack", "hack", "code", "code", "java", "java", "bug", "fix", "data", "loop", "loop", "if",
    "else", "try", "catch", "void", "null", "int", "float",
];

/// How keystrokes are matched against falling words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchMode {
    /// Type the oldest live word; every live duplicate advances with it
    #[default]
    Combo,
    /// Free-typed buffer; an exact match removes one word
    Prefix,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Combo => "Combo",
            MatchMode::Prefix => "Prefix",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "combo" => Some(MatchMode::Combo),
            "prefix" | "buffer" => Some(MatchMode::Prefix),
            _ => None,
        }
    }
}

/// What a wrong letter does in combo mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissPolicy {
    /// Misses are ignored
    #[default]
    Lenient,
    /// Misses restart the leader from its first letter
    Strict,
}

/// Spawn cadence and fall speed ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Delay before the very first spawn (ms)
    pub first_spawn_delay_ms: u32,
    /// Spawn interval at session start (ms)
    pub initial_spawn_interval_ms: u32,
    /// Interval reduction per spawn (ms)
    pub spawn_interval_step_ms: u32,
    /// Interval never drops below this (ms)
    pub min_spawn_interval_ms: u32,
    /// Fall speed at session start (px/tick)
    pub initial_fall_speed: f32,
    /// Fall speed increase per spawn
    pub fall_speed_step: f32,
    /// Fall speed never exceeds this
    pub max_fall_speed: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            first_spawn_delay_ms: 1000,
            initial_spawn_interval_ms: 2000,
            spawn_interval_step_ms: 50,
            min_spawn_interval_ms: 500,
            initial_fall_speed: 1.0,
            fall_speed_step: 0.05,
            max_fall_speed: 5.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Candidate words (duplicates allowed)
    pub words: Vec<String>,
    /// Difficulty ramp
    pub difficulty: DifficultyConfig,
    /// Matching policy
    pub match_mode: MatchMode,
    /// Wrong-letter handling in combo mode
    pub miss_policy: MissPolicy,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute everything
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            difficulty: DifficultyConfig::default(),
            match_mode: MatchMode::Combo,
            miss_policy: MissPolicy::Lenient,

            master_volume: 0.8,
            sfx_volume: 0.6,
            music_volume: 0.3,
            muted: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "combo_typer_settings";

    /// Parse settings from JSON, repairing invalid values
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check settings without repairing them
    pub fn check(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(Error::InvalidConfig("word list is empty".into()));
        }
        if let Some(bad) = self.words.iter().find(|w| !is_typeable(w)) {
            return Err(Error::InvalidConfig(format!("untypeable word {:?}", bad)));
        }
        let d = &self.difficulty;
        if d.min_spawn_interval_ms == 0 || d.min_spawn_interval_ms > d.initial_spawn_interval_ms {
            return Err(Error::InvalidConfig(format!(
                "spawn interval floor {} outside (0, {}]",
                d.min_spawn_interval_ms, d.initial_spawn_interval_ms
            )));
        }
        if !(d.initial_fall_speed > 0.0 && d.max_fall_speed >= d.initial_fall_speed) {
            return Err(Error::InvalidConfig(format!(
                "fall speed ceiling {} below initial {}",
                d.max_fall_speed, d.initial_fall_speed
            )));
        }
        Ok(())
    }

    /// Repair invalid values, logging each fix
    pub fn validated(mut self) -> Self {
        if let Err(e) = self.check() {
            log::warn!("Repairing settings: {}", e);
        }
        let defaults = Settings::default();

        let before = self.words.len();
        self.words = typeable_words(self.words);
        if self.words.len() != before {
            log::warn!("Dropped {} untypeable words", before - self.words.len());
        }
        if self.words.is_empty() {
            log::warn!("Word list empty, using defaults");
            self.words = defaults.words;
        }

        let d = &mut self.difficulty;
        if d.initial_spawn_interval_ms == 0 {
            log::warn!("Initial spawn interval is zero, using default");
            d.initial_spawn_interval_ms = defaults.difficulty.initial_spawn_interval_ms;
        }
        if d.min_spawn_interval_ms == 0 || d.min_spawn_interval_ms > d.initial_spawn_interval_ms {
            log::warn!(
                "Spawn interval floor {} invalid, clamping to {}",
                d.min_spawn_interval_ms,
                d.initial_spawn_interval_ms
            );
            d.min_spawn_interval_ms = d.initial_spawn_interval_ms;
        }
        if !(d.initial_fall_speed > 0.0) {
            log::warn!("Initial fall speed {} invalid, using default", d.initial_fall_speed);
            d.initial_fall_speed = defaults.difficulty.initial_fall_speed;
        }
        if !(d.max_fall_speed >= d.initial_fall_speed) {
            log::warn!("Fall speed ceiling {} below initial speed", d.max_fall_speed);
            d.max_fall_speed = d.initial_fall_speed;
        }
        if !(d.fall_speed_step >= 0.0) {
            d.fall_speed_step = 0.0;
        }

        self.master_volume = clamp_volume(self.master_volume);
        self.sfx_volume = clamp_volume(self.sfx_volume);
        self.music_volume = clamp_volume(self.music_volume);
        self
    }

    /// Effective sound effect volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.sfx_volume }
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.music_volume }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<()> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| Error::StorageUnavailable("no localStorage".into()))?;

        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| Error::StorageUnavailable("write failed".into()))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<()> {
        // No-op for native
        Ok(())
    }
}

pub(crate) fn is_typeable(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_check() {
        assert!(Settings::default().check().is_ok());
        assert_eq!(Settings::default().words.len(), 19);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"match_mode":"Prefix"}"#).unwrap();
        assert_eq!(settings.match_mode, MatchMode::Prefix);
        assert_eq!(settings.miss_policy, MissPolicy::Lenient);
        assert_eq!(settings.difficulty, DifficultyConfig::default());
    }

    #[test]
    fn test_validated_repairs_words() {
        let settings = Settings {
            words: vec!["Hack".into(), "two words".into(), "".into(), "c0de".into()],
            ..Default::default()
        }
        .validated();
        assert_eq!(settings.words, vec!["hack".to_string()]);

        let settings = Settings {
            words: vec!["!!".into()],
            ..Default::default()
        }
        .validated();
        assert_eq!(settings.words.len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_validated_repairs_difficulty() {
        let mut settings = Settings::default();
        settings.difficulty.min_spawn_interval_ms = 5000;
        settings.difficulty.max_fall_speed = 0.5;
        settings.master_volume = 3.0;
        assert!(settings.check().is_err());

        let settings = settings.validated();
        assert!(settings.check().is_ok());
        assert_eq!(settings.difficulty.min_spawn_interval_ms, 2000);
        assert_eq!(settings.difficulty.max_fall_speed, 1.0);
        assert_eq!(settings.master_volume, 1.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_mute() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert!((Settings::default().effective_sfx_volume() - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!(MatchMode::from_str("COMBO"), Some(MatchMode::Combo));
        assert_eq!(MatchMode::from_str("buffer"), Some(MatchMode::Prefix));
        assert_eq!(MatchMode::from_str("other"), None);
        for mode in [MatchMode::Combo, MatchMode::Prefix] {
            assert_eq!(MatchMode::from_str(mode.as_str()), Some(mode));
        }
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_native_save_is_noop() {
        assert!(Settings::default().save().is_ok());
        assert_eq!(Settings::load().words.len(), DEFAULT_WORDS.len());
    }
}
