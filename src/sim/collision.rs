//! Ring/ball collision classification and scoring
//!
//! A ring is only evaluated while its depth is inside the narrow band in
//! front of the hit plane. Inside the band the ball must sit on the ring's
//! perspective-scaled edge; the segment under the ball's angle then decides
//! between a match and a miss.
//!
//! Classification is pure. `tick` owns the reducer that turns an outcome into
//! score, effects and phase changes.

use glam::Vec2;

use super::segment::segment_at;
use super::state::Ring;
use crate::consts::{HIT_BAND_NEAR_Z, HIT_PLANE_Z};
use crate::palette::Color;
use crate::tuning::Tuning;
use crate::{cartesian_to_polar, normalize_angle};

/// Result of testing one ring against the ball this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Ring is not at the hit plane, or the ball is off its edge
    OutOfRange,
    /// Ball passed through the segment carrying its own color
    Match { segment: usize },
    /// Ball hit a wrong-color segment (`None` if no segment claimed the angle)
    Miss { segment: Option<usize> },
}

/// Radial band (screen units from center) the ball must be inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitZone {
    pub inner: f32,
    pub outer: f32,
}

impl HitZone {
    #[inline]
    pub fn contains(&self, distance: f32) -> bool {
        distance >= self.inner && distance <= self.outer
    }
}

/// True while `z` is inside the collidable band `(HIT_BAND_NEAR_Z, HIT_PLANE_Z]`
#[inline]
pub fn in_hit_band(z: f32) -> bool {
    z <= HIT_PLANE_Z && z > HIT_BAND_NEAR_Z
}

/// Perspective-scaled edge band of a ring at its current depth
pub fn hit_zone(ring: &Ring) -> HitZone {
    let radius = ring.scaled_radius();
    let thickness = ring.scaled_thickness();
    HitZone {
        inner: radius - thickness,
        outer: radius + thickness,
    }
}

/// Classify one ring against the ball
pub fn classify_ring(ring: &Ring, ball_pos: Vec2, ball_color: Color, center: Vec2) -> HitOutcome {
    if !in_hit_band(ring.z) {
        return HitOutcome::OutOfRange;
    }

    let (distance, theta) = cartesian_to_polar(ball_pos - center);
    if !hit_zone(ring).contains(distance) {
        return HitOutcome::OutOfRange;
    }

    // Angles that fall in no segment (float seams) count as misses
    match segment_at(&ring.segments, normalize_angle(theta)) {
        Some(idx) if ring.segments[idx].color == ball_color => HitOutcome::Match { segment: idx },
        segment => HitOutcome::Miss { segment },
    }
}

/// Points for a match at the given (already incremented) combo count
#[inline]
pub fn points_for_combo(combo: u32, tuning: &Tuning) -> u32 {
    let bonus = combo.checked_div(tuning.combo_tier).unwrap_or(0);
    tuning.base_points + bonus
}
