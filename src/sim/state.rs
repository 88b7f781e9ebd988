//! Game state and core simulation types
//!
//! Everything one session needs lives in `GameState`; the per-frame step in
//! `tick` is the only code that mutates it (apart from `rotate_ball`, which
//! the input boundary may call between frames).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::motion;
use super::segment::Segment;
use super::starfield::Starfield;
use super::trail::FluidTrail;
use crate::consts::*;
use crate::normalize_angle;
use crate::palette::{Color, PALETTE};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Title screen, only the starfield animates
    Menu,
    /// Active gameplay
    Playing,
    /// A miss happened; effects play out before the game over screen
    GameOverDelay,
    /// Run ended, waiting for restart
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::GameOverDelay => "gameOverDelay",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// Host surface size; the shared center derives from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the orbit (slightly below the middle of the screen)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0 + CENTER_OFFSET_Y)
    }
}

/// The player's ball
///
/// Position is never stored: it is derived from `angle` each frame so input
/// can mutate the angle freely without the two drifting apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Orbit angle (radians, unbounded; normalized where compared)
    pub angle: f32,
    pub orbit_radius: f32,
    pub radius: f32,
    pub color: Color,
    pub trail: FluidTrail,
}

impl Ball {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            angle: 0.0,
            orbit_radius: BALL_ORBIT_RADIUS,
            radius: BALL_RADIUS,
            color: PALETTE[0],
            trail: FluidTrail::new(tuning.trail_length, tuning.trail_spacing, tuning.trail_lerp),
        }
    }

    /// Screen position around `center`
    pub fn position(&self, center: Vec2) -> Vec2 {
        motion::ball_position(center, self.angle, self.orbit_radius)
    }
}

/// An approaching ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    pub id: u32,
    /// Colored arcs partitioning [0, 2π)
    pub segments: Vec<Segment>,
    /// Depth (decreases every frame)
    pub z: f32,
    pub radius: f32,
    pub thickness: f32,
    /// Depth units per frame, fixed at spawn time
    pub speed: f32,
    /// Frames of shake remaining (visual only)
    pub shake: u32,
    pub shake_intensity: f32,
    /// Current jitter applied to the ring's drawn center
    pub shake_offset: Vec2,
}

impl Ring {
    pub fn new(id: u32, segments: Vec<Segment>, speed: f32) -> Self {
        Self {
            id,
            segments,
            z: RING_SPAWN_Z,
            radius: RING_RADIUS,
            thickness: RING_THICKNESS,
            speed,
            shake: 0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
        }
    }

    /// Perspective scale at the current depth
    #[inline]
    pub fn scale(&self) -> f32 {
        motion::perspective_scale(self.z)
    }

    pub fn scaled_radius(&self) -> f32 {
        self.radius * self.scale()
    }

    pub fn scaled_thickness(&self) -> f32 {
        self.thickness * self.scale()
    }

    /// Begin a decaying shake (on a wrong-color hit)
    pub fn start_shake(&mut self, frames: u32, intensity: f32) {
        self.shake = frames;
        self.shake_intensity = intensity;
    }

    /// Roll this frame's jitter and decay the shake
    pub fn update_shake<R: Rng + ?Sized>(&mut self, rng: &mut R, total_frames: u32, decay: f32) {
        if self.shake == 0 {
            self.shake_offset = Vec2::ZERO;
            return;
        }
        let progress = self.shake as f32 / total_frames.max(1) as f32;
        let intensity = self.shake_intensity * progress;
        self.shake_offset = Vec2::new(
            (rng.random::<f32>() - 0.5) * intensity,
            (rng.random::<f32>() - 0.5) * intensity,
        );
        self.shake -= 1;
        self.shake_intensity *= decay;
    }

    /// Distinct colors carried by this ring, in segment order
    pub fn colors(&self) -> Vec<Color> {
        let mut out: Vec<Color> = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            if !out.contains(&seg.color) {
                out.push(seg.color);
            }
        }
        out
    }
}

/// Per-session scalars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    /// Best score across sessions (loaded from storage by the host)
    pub best_score: u64,
    pub combo: u32,
    pub max_combo: u32,
    /// Global ring speed handed to newly spawned rings
    pub ring_speed: f32,
    /// Frames between ring spawns
    pub spawn_interval: f32,
    pub spawn_timer: u32,
    /// Palette cursor used when no ring is queued
    pub color_index: usize,
    /// Latched on the first miss so it only fires once
    pub game_over_triggered: bool,
    /// Frames left in `GameOverDelay`
    pub game_over_delay: u32,
    pub music_enabled: bool,
}

impl Session {
    pub fn new(tuning: &Tuning, best_score: u64) -> Self {
        Self {
            score: 0,
            best_score,
            combo: 0,
            max_combo: 0,
            ring_speed: tuning.ring_speed_start,
            spawn_interval: tuning.spawn_interval_start,
            spawn_timer: 0,
            color_index: 0,
            game_over_triggered: false,
            game_over_delay: 0,
            music_enabled: true,
        }
    }

    /// Fresh session values; best score and music preference survive
    pub fn reset(&mut self, tuning: &Tuning) {
        let best = self.best_score;
        let music = self.music_enabled;
        *self = Self::new(tuning, best);
        self.music_enabled = music;
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub ball: Ball,
    /// Active rings, oldest first
    pub rings: Vec<Ring>,
    pub session: Session,
    /// Visual particles and popups (not gameplay-affecting)
    pub effects: Effects,
    pub starfield: Starfield,
    /// Frames simulated since construction
    pub frame: u64,
    next_id: u32,
}

impl GameState {
    /// Create a game sitting in the menu
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport, best_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::new(&mut rng, tuning.star_count, viewport);
        Self {
            seed,
            rng,
            phase: GamePhase::Menu,
            viewport,
            ball: Ball::new(&tuning),
            rings: Vec::new(),
            session: Session::new(&tuning, best_score),
            effects: Effects::new(tuning.max_particles),
            starfield,
            frame: 0,
            next_id: 1,
            tuning,
        }
    }

    /// Shared center of the orbit and rings
    pub fn center(&self) -> Vec2 {
        self.viewport.center()
    }

    pub fn ball_position(&self) -> Vec2 {
        self.ball.position(self.center())
    }

    /// Allocate a new ring ID
    pub fn next_ring_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Input boundary hook: rotate the ball between frames
    ///
    /// The stored angle stays in [0, 2π) however long the player spins.
    pub fn rotate_ball(&mut self, delta: f32) {
        if self.phase == GamePhase::Playing && delta.is_finite() {
            self.ball.angle = normalize_angle(self.ball.angle + delta);
        }
    }

    /// Host surface changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width.max(1.0), height.max(1.0));
    }

    /// Drop everything from the previous run and enter `Playing`
    pub fn reset_session(&mut self) {
        self.session.reset(&self.tuning);
        self.rings.clear();
        self.effects.clear();
        self.ball.angle = 0.0;
        self.ball.color = PALETTE[self.session.color_index];
        self.ball.trail.reset();
        self.phase = GamePhase::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn ring_with(colors: &[Color]) -> Ring {
        let span = std::f32::consts::TAU / colors.len() as f32;
        let segments = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| Segment::new(i as f32 * span, (i + 1) as f32 * span, c))
            .collect();
        Ring::new(1, segments, 6.0)
    }

    #[test]
    fn test_new_state_starts_in_menu() {
        let state = GameState::new(7, Tuning::default(), Viewport::default(), 12);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.session.best_score, 12);
        assert_eq!(state.ball.color, PALETTE[0]);
        assert!(state.rings.is_empty());
        assert_eq!(state.starfield.stars().len(), Tuning::default().star_count);
    }

    #[test]
    fn test_ball_position_is_derived_from_angle() {
        let mut state = GameState::new(1, Tuning::default(), Viewport::new(400.0, 300.0), 0);
        let center = state.center();
        assert_eq!(center, Vec2::new(200.0, 200.0));
        state.ball.angle = PI / 2.0;
        let pos = state.ball_position();
        assert!((pos.x - 200.0).abs() < 1e-3);
        assert!((pos.y - 350.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_ball_only_while_playing() {
        let mut state = GameState::new(1, Tuning::default(), Viewport::default(), 0);
        state.rotate_ball(0.5);
        assert_eq!(state.ball.angle, 0.0);
        state.reset_session();
        state.rotate_ball(0.5);
        state.rotate_ball(f32::NAN);
        assert_eq!(state.ball.angle, 0.5);
    }

    #[test]
    fn test_rotate_ball_stays_wrapped() {
        use std::f32::consts::TAU;

        let mut state = GameState::new(1, Tuning::default(), Viewport::default(), 0);
        state.reset_session();
        for _ in 0..200_000 {
            state.rotate_ball(0.15);
            assert!((0.0..TAU).contains(&state.ball.angle));
        }
        // 200k * 0.15 = 30000 rad
        let expected = (30000.0f64).rem_euclid(std::f64::consts::TAU) as f32;
        assert!(
            (state.ball.angle - expected).abs() < 0.1,
            "angle {} expected {}",
            state.ball.angle,
            expected
        );

        for _ in 0..1000 {
            state.rotate_ball(-0.4);
            assert!((0.0..TAU).contains(&state.ball.angle));
        }
    }

    #[test]
    fn test_session_reset_keeps_best_and_music() {
        let tuning = Tuning::default();
        let mut session = Session::new(&tuning, 40);
        session.score = 9;
        session.combo = 4;
        session.ring_speed = 9.0;
        session.music_enabled = false;
        session.reset(&tuning);
        assert_eq!(session.score, 0);
        assert_eq!(session.combo, 0);
        assert_eq!(session.ring_speed, tuning.ring_speed_start);
        assert_eq!(session.best_score, 40);
        assert!(!session.music_enabled);
    }

    #[test]
    fn test_ring_shake_decays_to_rest() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ring = ring_with(&[PALETTE[0], PALETTE[1]]);
        ring.start_shake(30, 15.0);
        for _ in 0..30 {
            ring.update_shake(&mut rng, 30, 0.95);
            assert!(ring.shake_offset.x.abs() <= 7.5);
            assert!(ring.shake_offset.y.abs() <= 7.5);
        }
        assert_eq!(ring.shake, 0);
        ring.update_shake(&mut rng, 30, 0.95);
        assert_eq!(ring.shake_offset, Vec2::ZERO);
    }

    #[test]
    fn test_ring_colors_are_distinct() {
        let ring = ring_with(&[PALETTE[2], PALETTE[3], PALETTE[2]]);
        assert_eq!(ring.colors(), vec![PALETTE[2], PALETTE[3]]);
    }

    #[test]
    fn test_ring_scale_at_hit_plane() {
        let mut ring = ring_with(&[PALETTE[0], PALETTE[1]]);
        ring.z = HIT_PLANE_Z;
        assert!((ring.scale() - 1.0).abs() < 1e-6);
        assert!((ring.scaled_radius() - RING_RADIUS).abs() < 1e-4);
        ring.z = 300.0;
        assert!((ring.scaled_thickness() - RING_THICKNESS / 2.0).abs() < 1e-4);
    }
}
