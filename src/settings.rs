//! Game settings and preferences
//!
//! Persisted separately from records, as one JSON value under `SETTINGS_KEY`.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::tuning::Tuning;

/// Storage key for the settings JSON
pub const SETTINGS_KEY: &str = "colorRingSettings";

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles per effect list
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Background star count
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 100,
            QualityPreset::High => 160,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Explosion and burst particles
    pub particles: bool,
    /// Parallax star background
    pub starfield: bool,

    // === Audio ===
    /// Background music on at launch
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            starfield: true,
            music_enabled: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective star count
    pub fn star_count(&self) -> usize {
        if !self.starfield {
            0
        } else {
            self.quality.star_count()
        }
    }

    /// Fold presentation preferences into the tuning a session runs with
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.max_particles = self.max_particles();
        tuning.star_count = self.star_count();
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(SETTINGS_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            }
        }
        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(anyhow::Error::from)
            .and_then(|json| store.set(SETTINGS_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_disabled_effects_zero_the_caps() {
        let mut s = Settings::from_preset(QualityPreset::High);
        s.particles = false;
        s.starfield = false;
        let mut t = Tuning::default();
        s.apply_to(&mut t);
        assert_eq!(t.max_particles, 0);
        assert_eq!(t.star_count, 0);
    }

    #[test]
    fn test_medium_preset_matches_default_tuning() {
        let mut t = Tuning::default();
        Settings::default().apply_to(&mut t);
        assert_eq!(t, Tuning::default());
    }

    #[test]
    fn test_settings_from_older_saves_still_load() {
        let mut store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"quality":"High","music_enabled":false,"music_volume":0.4}"#)
            .unwrap();
        let s = Settings::load(&store);
        assert_eq!(s.quality, QualityPreset::High);
        assert!(!s.music_enabled);
        assert!(s.particles);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut s = Settings::from_preset(QualityPreset::Low);
        s.music_enabled = false;
        s.save(&mut store);
        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "[1,2,3]").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
