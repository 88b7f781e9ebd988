//! Data-driven game balance
//!
//! Every pacing constant lives here so hosts can ship a JSON override. All
//! values are per frame at `consts::FRAMES_PER_SECOND`. Missing fields fall
//! back to the defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ring pacing ===
    /// Depth units per frame for rings spawned at session start
    pub ring_speed_start: f32,
    /// Upper bound for the global ring speed
    pub ring_speed_max: f32,
    /// Global ring speed gained per successful match
    pub ring_speed_increment: f32,
    /// Frames between spawns at session start
    pub spawn_interval_start: f32,
    /// Lower bound for the spawn interval
    pub spawn_interval_min: f32,
    /// Interval reduction applied after every spawn
    pub spawn_interval_decay: f32,

    // === Scoring ===
    /// While score <= this, rings always have two segments
    pub easy_score_threshold: u64,
    pub base_points: u32,
    /// One bonus point per this many consecutive matches
    pub combo_tier: u32,
    /// Frames of effects between a miss and the game over screen
    pub game_over_delay_frames: u32,

    // === Effects ===
    pub burst_count: usize,
    pub burst_life: u32,
    pub burst_friction: f32,
    pub explosion_count: usize,
    pub explosion_life: u32,
    pub explosion_gravity: f32,
    pub popup_life: u32,
    /// Upward drift of score popups (screen units per frame)
    pub popup_rise: f32,
    /// Cap on each of the explosion and burst lists (oldest dropped first)
    pub max_particles: usize,
    pub shake_frames: u32,
    pub shake_intensity: f32,
    pub shake_decay: f32,

    // === Fluid trail ===
    pub trail_length: usize,
    pub trail_spacing: f32,
    pub trail_lerp: f32,

    // === Starfield ===
    pub star_count: usize,
    /// Probability per frame of spawning a star trail
    pub star_trail_chance: f32,
    pub star_trail_life: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ring_speed_start: 6.0,
            ring_speed_max: 10.0,
            ring_speed_increment: 0.2,
            spawn_interval_start: 80.0,
            spawn_interval_min: 60.0,
            spawn_interval_decay: 0.5,

            easy_score_threshold: 10,
            base_points: 1,
            combo_tier: 3,
            game_over_delay_frames: 60,

            burst_count: 20,
            burst_life: 45,
            burst_friction: 0.98,
            explosion_count: 25,
            explosion_life: 90,
            explosion_gravity: 0.1,
            popup_life: 90,
            popup_rise: 2.0,
            max_particles: 500,
            shake_frames: 30,
            shake_intensity: 15.0,
            shake_decay: 0.95,

            trail_length: 150,
            trail_spacing: 8.0,
            trail_lerp: 0.6,

            star_count: 100,
            star_trail_chance: 0.1,
            star_trail_life: 30,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse tuning JSON")
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read tuning file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load from file, falling back to defaults. Returns the error text when
    /// the fallback was taken.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(tuning) => (tuning, None),
            Err(e) => (Self::default(), Some(format!("{e:#}"))),
        }
    }

    /// Non-fatal sanity checks. Each entry is a human-readable warning.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();

        if self.ring_speed_start <= 0.0 {
            w.push(format!(
                "ring_speed_start {} must be positive (rings would never arrive)",
                self.ring_speed_start
            ));
        }
        if self.ring_speed_max < self.ring_speed_start {
            w.push(format!(
                "ring_speed_max {} is below ring_speed_start {}",
                self.ring_speed_max, self.ring_speed_start
            ));
        }
        if self.ring_speed_increment < 0.0 {
            w.push("ring_speed_increment is negative; speed would fall on hits".into());
        }
        if self.spawn_interval_min < 1.0 {
            w.push(format!(
                "spawn_interval_min {} spawns a ring every frame",
                self.spawn_interval_min
            ));
        }
        if self.spawn_interval_start < self.spawn_interval_min {
            w.push(format!(
                "spawn_interval_start {} is below spawn_interval_min {}",
                self.spawn_interval_start, self.spawn_interval_min
            ));
        }
        if self.combo_tier == 0 {
            w.push("combo_tier is 0; combo bonus disabled".into());
        }
        // A ring must spend at least one frame inside the hit band or it can
        // fly through the ball unscored.
        let band = crate::consts::HIT_PLANE_Z - crate::consts::HIT_BAND_NEAR_Z;
        if self.ring_speed_max >= band {
            w.push(format!(
                "ring_speed_max {} can skip the {band}-deep hit band",
                self.ring_speed_max
            ));
        }
        if !(0.0..=1.0).contains(&self.burst_friction) {
            w.push(format!("burst_friction {} outside 0..=1", self.burst_friction));
        }
        if !(0.0..=1.0).contains(&self.shake_decay) {
            w.push(format!("shake_decay {} outside 0..=1", self.shake_decay));
        }
        if self.trail_length < 2 {
            w.push(format!("trail_length {} is too short for a ribbon", self.trail_length));
        }
        if !(0.0..=1.0).contains(&self.trail_lerp) {
            w.push(format!("trail_lerp {} outside 0..=1", self.trail_lerp));
        }
        if !(0.0..=1.0).contains(&self.star_trail_chance) {
            w.push(format!(
                "star_trail_chance {} is not a probability",
                self.star_trail_chance
            ));
        }
        w
    }
}
