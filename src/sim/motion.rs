//! Depth and motion model
//!
//! Rings fly toward the viewer at the speed they were spawned with; the ball
//! position is a pure function of its orbit angle.

use glam::Vec2;

use super::state::Ring;
use crate::consts::{HIT_PLANE_Z, NEAR_PLANE_Z};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Ball position on its orbit around `center`
#[inline]
pub fn ball_position(center: Vec2, angle: f32, orbit_radius: f32) -> Vec2 {
    center + polar_to_cartesian(orbit_radius, angle)
}

/// Perspective scale of an object at depth `z`, 1.0 at the hit plane
#[inline]
pub fn perspective_scale(z: f32) -> f32 {
    HIT_PLANE_Z / z.max(f32::EPSILON)
}

/// Move a ring one frame closer using its own spawn-time speed
#[inline]
pub fn advance_ring(ring: &mut Ring) {
    ring.z -= ring.speed;
}

/// True once a ring is close enough to be discarded
#[inline]
pub fn past_near_plane(ring: &Ring) -> bool {
    ring.z < NEAR_PLANE_Z
}

/// Global ring speed after a successful hit
pub fn ramp_speed(current: f32, tuning: &Tuning) -> f32 {
    (current + tuning.ring_speed_increment).min(tuning.ring_speed_max)
}

/// Spawn interval after a ring spawned
pub fn decay_spawn_interval(current: f32, tuning: &Tuning) -> f32 {
    (current - tuning.spawn_interval_decay).max(tuning.spawn_interval_min)
}
