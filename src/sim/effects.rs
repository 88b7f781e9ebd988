//! Particle effects and score popups
//!
//! Three independent lists, each integrated once per frame and culled when
//! its life counter runs out:
//! - explosion particles (miss): radial, pulled down by constant gravity
//! - burst particles (match): radial, slowed by multiplicative friction
//! - score popups: drift straight up

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::palette::Color;
use crate::tuning::Tuning;

/// Initial particle speed range for both radial effects
const PARTICLE_SPEED_MIN: f32 = 3.0;
const PARTICLE_SPEED_MAX: f32 = 7.0;
const BURST_SIZE_MIN: f32 = 3.0;
const BURST_SIZE_MAX: f32 = 8.0;
const EXPLOSION_SIZE_MIN: f32 = 3.0;
const EXPLOSION_SIZE_MAX: f32 = 9.0;
/// Live score popups; independent of the particle cap so popups survive
/// with particles turned off
pub const MAX_POPUPS: usize = 64;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    /// Remaining life in [0, 1]
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }

    /// Radius to draw at (shrinks as the particle fades)
    #[inline]
    pub fn draw_size(&self) -> f32 {
        self.size * self.life_ratio()
    }
}

/// Floating "+N" text spawned on a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub points: u32,
    /// Color of the matched segment
    pub color: Color,
    /// Combo count at the time of the award
    pub combo: u32,
    /// Vertical velocity (negative is up on screen)
    pub vy: f32,
    pub life: u32,
    pub max_life: u32,
}

impl ScorePopup {
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }

    pub fn label(&self) -> String {
        format!("+{}", self.points)
    }

    /// Secondary label, only for real combos
    pub fn combo_label(&self) -> Option<String> {
        (self.combo > 1).then(|| format!("{}x COMBO!", self.combo))
    }
}

/// Evenly spaced directions with a random speed each
fn radial_particles<R: Rng + ?Sized>(
    rng: &mut R,
    pos: Vec2,
    color: Color,
    count: usize,
    life: u32,
    size_range: (f32, f32),
) -> impl Iterator<Item = Particle> + '_ {
    (0..count).map(move |i| {
        let angle = TAU * i as f32 / count as f32;
        let speed = rng.random_range(PARTICLE_SPEED_MIN..PARTICLE_SPEED_MAX);
        Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color,
            life,
            max_life: life,
            size: rng.random_range(size_range.0..size_range.1),
        }
    })
}

/// Trim a list to `cap` by dropping its oldest entries
fn enforce_cap<T>(list: &mut Vec<T>, cap: usize) {
    if list.len() > cap {
        let excess = list.len() - cap;
        list.drain(..excess);
    }
}

/// All transient effect lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub explosions: Vec<Particle>,
    pub bursts: Vec<Particle>,
    pub popups: Vec<ScorePopup>,
    /// Upper bound per particle list
    max_particles: usize,
}

impl Effects {
    pub fn new(max_particles: usize) -> Self {
        Self {
            max_particles,
            ..Default::default()
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// Celebration burst on a successful match
    pub fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pos: Vec2,
        color: Color,
        count: usize,
        tuning: &Tuning,
    ) {
        let particles = radial_particles(
            rng,
            pos,
            color,
            count,
            tuning.burst_life,
            (BURST_SIZE_MIN, BURST_SIZE_MAX),
        );
        self.bursts.extend(particles);
        enforce_cap(&mut self.bursts, self.max_particles);
    }

    /// Ball explosion on a miss
    pub fn spawn_explosion<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pos: Vec2,
        color: Color,
        tuning: &Tuning,
    ) {
        let particles = radial_particles(
            rng,
            pos,
            color,
            tuning.explosion_count,
            tuning.explosion_life,
            (EXPLOSION_SIZE_MIN, EXPLOSION_SIZE_MAX),
        );
        self.explosions.extend(particles);
        enforce_cap(&mut self.explosions, self.max_particles);
    }

    pub fn spawn_popup(&mut self, pos: Vec2, points: u32, color: Color, combo: u32, tuning: &Tuning) {
        self.popups.push(ScorePopup {
            pos,
            points,
            color,
            combo,
            vy: -tuning.popup_rise,
            life: tuning.popup_life,
            max_life: tuning.popup_life,
        });
        enforce_cap(&mut self.popups, MAX_POPUPS);
    }

    /// Integrate one frame and cull expired entries
    pub fn update(&mut self, tuning: &Tuning) {
        for p in &mut self.explosions {
            p.pos += p.vel;
            p.vel.y += tuning.explosion_gravity;
            p.life = p.life.saturating_sub(1);
        }
        self.explosions.retain(|p| p.life > 0);

        for p in &mut self.bursts {
            p.pos += p.vel;
            p.vel *= tuning.burst_friction;
            p.life = p.life.saturating_sub(1);
        }
        self.bursts.retain(|p| p.life > 0);

        for popup in &mut self.popups {
            popup.pos.y += popup.vy;
            popup.life = popup.life.saturating_sub(1);
        }
        self.popups.retain(|p| p.life > 0);
    }

    /// Drop everything in flight (session reset)
    pub fn clear(&mut self) {
        self.explosions.clear();
        self.bursts.clear();
        self.popups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty() && self.bursts.is_empty() && self.popups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_is_radial_and_damped() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fx = Effects::new(t.max_particles);
        fx.spawn_burst(&mut rng, Vec2::ZERO, PALETTE[0], 4, &t);
        assert_eq!(fx.bursts.len(), 4);
        // first particle heads along +x
        assert!(fx.bursts[0].vel.y.abs() < 1e-5);
        assert!(fx.bursts[0].vel.x >= PARTICLE_SPEED_MIN);

        let speed_before = fx.bursts[1].vel.length();
        fx.update(&t);
        let speed_after = fx.bursts[1].vel.length();
        assert!((speed_after - speed_before * 0.98).abs() < 1e-4);
    }

    #[test]
    fn test_explosion_falls_under_gravity() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut fx = Effects::new(t.max_particles);
        fx.spawn_explosion(&mut rng, Vec2::ZERO, PALETTE[1], &t);
        assert_eq!(fx.explosions.len(), t.explosion_count);
        let vy = fx.explosions[0].vel.y;
        let vx = fx.explosions[0].vel.x;
        fx.update(&t);
        assert!((fx.explosions[0].vel.y - (vy + 0.1)).abs() < 1e-5);
        assert_eq!(fx.explosions[0].vel.x, vx);
    }

    #[test]
    fn test_effects_expire_after_their_lifetime() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut fx = Effects::new(t.max_particles);
        fx.spawn_burst(&mut rng, Vec2::ZERO, PALETTE[0], 20, &t);
        fx.spawn_explosion(&mut rng, Vec2::ZERO, PALETTE[0], &t);
        fx.spawn_popup(Vec2::ZERO, 2, PALETTE[2], 4, &t);

        for _ in 0..t.burst_life {
            fx.update(&t);
        }
        assert!(fx.bursts.is_empty());
        assert!(!fx.explosions.is_empty());

        for _ in t.burst_life..t.explosion_life.max(t.popup_life) {
            fx.update(&t);
        }
        assert!(fx.is_empty());
    }

    #[test]
    fn test_popup_rises_and_labels() {
        let t = Tuning::default();
        let mut fx = Effects::new(t.max_particles);
        fx.spawn_popup(Vec2::new(10.0, 100.0), 3, PALETTE[3], 7, &t);
        fx.update(&t);
        let popup = &fx.popups[0];
        assert_eq!(popup.pos.y, 98.0);
        assert_eq!(popup.label(), "+3");
        assert_eq!(popup.combo_label().as_deref(), Some("7x COMBO!"));

        fx.spawn_popup(Vec2::ZERO, 1, PALETTE[3], 1, &t);
        assert_eq!(fx.popups[1].combo_label(), None);
    }

    #[test]
    fn test_particle_lists_are_capped() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut fx = Effects::new(30);
        fx.spawn_burst(&mut rng, Vec2::ZERO, PALETTE[0], 20, &t);
        fx.spawn_burst(&mut rng, Vec2::ONE, PALETTE[1], 20, &t);
        assert_eq!(fx.bursts.len(), 30);
        // the newest burst survives intact
        assert!(fx.bursts.iter().rev().take(20).all(|p| p.pos == Vec2::ONE));
    }

    #[test]
    fn test_popups_are_capped() {
        let t = Tuning::default();
        let mut fx = Effects::new(0);
        for points in 0..(MAX_POPUPS as u32 + 36) {
            fx.spawn_popup(Vec2::ZERO, points, PALETTE[2], 1, &t);
        }
        assert_eq!(fx.popups.len(), MAX_POPUPS);
        // oldest dropped first
        assert_eq!(fx.popups[0].points, 36);
        assert_eq!(fx.popups.last().map(|p| p.points), Some(MAX_POPUPS as u32 + 35));
    }

    #[test]
    fn test_draw_size_shrinks_with_life() {
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: PALETTE[0],
            life: 45,
            max_life: 90,
            size: 6.0,
        };
        assert_eq!(p.life_ratio(), 0.5);
        assert_eq!(p.draw_size(), 3.0);
    }
}
