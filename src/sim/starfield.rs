//! Parallax starfield
//!
//! Stars fly toward the viewer independent of gameplay and wrap back to the
//! far plane when they pass it. Star trails are short streaks dropped at a
//! random star's position.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::consts::{STAR_FAR_Z, STAR_FOCAL, STAR_NEAR_Z};
use crate::palette::{Color, STAR_LAVENDER, STAR_WHITE};
use crate::tuning::Tuning;

/// Fraction of stars tinted lavender instead of white
const LAVENDER_SHARE: f32 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    /// Position on the far plane (viewport coordinates)
    pub origin: Vec2,
    pub z: f32,
    pub size: f32,
    pub opacity: f32,
    /// Depth units per frame
    pub speed: f32,
    pub color: Color,
    /// Projected values, refreshed every update
    pub screen_pos: Vec2,
    pub screen_size: f32,
    pub screen_opacity: f32,
}

impl Star {
    fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        let color = if rng.random::<f32>() > LAVENDER_SHARE {
            STAR_WHITE
        } else {
            STAR_LAVENDER
        };
        Self {
            origin: random_origin(rng, viewport),
            z: rng.random_range(0.0..STAR_FAR_Z),
            size: rng.random_range(1.0..4.0),
            opacity: rng.random_range(0.2..1.0),
            speed: rng.random_range(1.0..3.0),
            color,
            screen_pos: Vec2::ZERO,
            screen_size: 0.0,
            screen_opacity: 0.0,
        }
    }

    /// Refresh the perspective projection about `center`
    pub fn project(&mut self, center: Vec2) {
        let z = self.z.max(STAR_NEAR_Z);
        let scale = STAR_FOCAL / z;
        self.screen_pos = center + (self.origin - center) * scale;
        self.screen_size = self.size * scale;
        self.screen_opacity = ((STAR_FAR_Z - z) / STAR_FOCAL).min(1.0);
    }

    /// Final alpha to draw with
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.screen_opacity * self.opacity
    }
}

/// A fading streak left at a star's position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarTrail {
    pub pos: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub opacity: f32,
}

impl StarTrail {
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32 * self.opacity
    }
}

fn random_origin<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * viewport.width,
        rng.random::<f32>() * viewport.height,
    )
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Starfield {
    stars: Vec<Star>,
    trails: Vec<StarTrail>,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, viewport: Viewport) -> Self {
        let center = viewport.center();
        let stars = (0..count)
            .map(|_| {
                let mut star = Star::random(rng, viewport);
                star.project(center);
                star
            })
            .collect();
        Self {
            stars,
            trails: Vec::new(),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn trails(&self) -> &[StarTrail] {
        &self.trails
    }

    /// Advance stars and star trails one frame
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, viewport: Viewport, tuning: &Tuning) {
        let center = viewport.center();
        for star in &mut self.stars {
            star.z -= star.speed;
            if star.z < STAR_NEAR_Z {
                star.z = STAR_FAR_Z;
                star.origin = random_origin(rng, viewport);
            }
            star.project(center);
        }

        for trail in &mut self.trails {
            trail.life = trail.life.saturating_sub(1);
        }
        self.trails.retain(|t| t.life > 0);

        if !self.stars.is_empty() && rng.random::<f32>() < tuning.star_trail_chance {
            let star = &self.stars[rng.random_range(0..self.stars.len())];
            self.trails.push(StarTrail {
                pos: star.origin,
                life: tuning.star_trail_life,
                max_life: tuning.star_trail_life,
                opacity: star.opacity,
            });
        }
    }
}
