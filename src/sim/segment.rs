//! Ring segment geometry
//!
//! A segment is a colored arc of a ring, defined by:
//! - start_angle, end_angle: angular extent in [0, 2π)
//! - color: the color the ball must carry to pass through it
//!
//! A segment with `start_angle > end_angle` wraps through 0. Membership is
//! half-open, `[start, end)`, so adjacent segments never both claim a boundary.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::normalize_angle;
use crate::palette::Color;

/// A colored arc of a ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start angle (radians, [0, 2π))
    pub start_angle: f32,
    /// End angle (radians, (0, 2π]; 2π only for the closing segment)
    pub end_angle: f32,
    pub color: Color,
}

impl Segment {
    pub fn new(start_angle: f32, end_angle: f32, color: Color) -> Self {
        Self {
            start_angle,
            end_angle,
            color,
        }
    }

    /// True if the arc crosses the 2π -> 0 seam
    #[inline]
    pub fn wraps(&self) -> bool {
        self.start_angle > self.end_angle
    }

    /// Angular width (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.end_angle - self.start_angle;
        if span < 0.0 {
            span += TAU;
        }
        span
    }

    /// Check if an angle is within the segment's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = normalize_angle(theta);
        if self.wraps() {
            theta >= self.start_angle || theta < self.end_angle
        } else {
            theta >= self.start_angle && theta < self.end_angle
        }
    }

    /// Angle halfway through the arc, normalized
    pub fn mid_angle(&self) -> f32 {
        normalize_angle(self.start_angle + self.angular_span() / 2.0)
    }
}

/// Index of the first segment containing `theta`
pub fn segment_at(segments: &[Segment], theta: f32) -> Option<usize> {
    segments.iter().position(|s| s.contains_angle(theta))
}
