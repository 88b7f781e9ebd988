//! Color Ring - a color-matching ring arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ring generation, collision, scoring, effects)
//! - `palette`: The fixed ball/segment color palette
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `persistence`: Key-value storage (file on native, LocalStorage on web)
//! - `records`: Best score and first-visit bookkeeping
//! - `platform`: Browser/native platform glue

pub mod palette;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use palette::{Color, PALETTE};
pub use records::Records;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game geometry constants
pub mod consts {
    /// Nominal frame rate every per-frame constant is tuned for
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// The shared center sits this far below the viewport middle
    pub const CENTER_OFFSET_Y: f32 = 50.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    pub const BALL_ORBIT_RADIUS: f32 = 150.0;

    /// Ring geometry at spawn time
    pub const RING_SPAWN_Z: f32 = 1000.0;
    pub const RING_RADIUS: f32 = 150.0;
    pub const RING_THICKNESS: f32 = 20.0;

    /// Depth at which rings are scored against the ball
    pub const HIT_PLANE_Z: f32 = 150.0;
    /// Rings are collidable while `HIT_BAND_NEAR_Z < z <= HIT_PLANE_Z`
    pub const HIT_BAND_NEAR_Z: f32 = 130.0;
    /// Rings closer than this are discarded
    pub const NEAR_PLANE_Z: f32 = 100.0;

    /// Starfield depth range
    pub const STAR_FAR_Z: f32 = 2000.0;
    /// Stars closer than this wrap back to `STAR_FAR_Z`
    pub const STAR_NEAR_Z: f32 = 1.0;
    /// Focal length of the star projection (`scale = STAR_FOCAL / z`)
    pub const STAR_FOCAL: f32 = 1000.0;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed difference `to - from`, wrapped to [-π, π]
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut delta = to - from;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    delta
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!(normalize_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_angle_delta_wraps() {
        assert!((angle_delta(0.1, TAU - 0.1) + 0.2).abs() < 1e-5);
        assert!((angle_delta(TAU - 0.1, 0.1) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_polar_round_trip() {
        let p = polar_to_cartesian(150.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 150.0).abs() < 1e-3);
        assert!((theta - PI / 3.0).abs() < 1e-5);
    }
}
