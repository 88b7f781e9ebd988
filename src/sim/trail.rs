//! Fluid trail behind the ball
//!
//! A fixed number of sample points behaves like a cascading shift register:
//! every frame each point takes its predecessor's value and the head takes
//! the ball's. Storage is a ring buffer with a rotating head index so the
//! shift is O(1); the buffer is allocated once and only ever overwritten.
//!
//! After the shift, every point past the head eases toward a target laid out
//! radially behind the ball, which gives the ribbon its elastic lag.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::angle_delta;

/// Ball must move further than this per frame for the trail to curve
const MOVING_THRESHOLD: f32 = 0.1;
/// How strongly angular velocity bends the trail
const ROTATION_CURVE: f32 = 0.2;
/// Trail index where the bend peaks
const CURVE_PEAK_INDEX: f32 = 10.0;
const CURVE_AMPLITUDE: f32 = 0.8;

/// Ribbon glow layers (alpha per layer, outer passes first)
const GLOW_LAYERS: u32 = 3;
const GLOW_ALPHA_STEP: f32 = 0.06;
/// Each glow layer widens the ribbon by this factor
const GLOW_EXPAND: f32 = 1.05;

/// Opacity ramp along the ribbon: (position along trail, alpha byte)
pub const GRADIENT_STOPS: [(f32, u8); 6] = [
    (0.0, 0x00),
    (0.1, 0x40),
    (0.2, 0x80),
    (0.4, 0xFF),
    (0.8, 0x80),
    (1.0, 0x20),
];

/// A trail sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Ball orbit angle when the sample was taken
    pub angle: f32,
}

impl Default for TrailPoint {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            angle: 0.0,
        }
    }
}

/// Ring-buffered trail of the ball's recent motion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidTrail {
    points: Vec<TrailPoint>,
    /// Physical index of logical point 0
    head: usize,
    /// False until the first frame of a session fills the buffer
    primed: bool,
    /// Ball position and angle seen on the previous update
    prev: Option<TrailPoint>,
    spacing: f32,
    lerp: f32,
}

impl FluidTrail {
    pub fn new(length: usize, spacing: f32, lerp: f32) -> Self {
        Self {
            points: vec![TrailPoint::default(); length],
            head: 0,
            primed: false,
            prev: None,
            spacing,
            lerp,
        }
    }

    /// Forget the previous session; the buffer itself is kept
    pub fn reset(&mut self) {
        self.head = 0;
        self.primed = false;
        self.prev = None;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True once the trail holds samples for the current session
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    #[inline]
    fn physical(&self, logical: usize) -> usize {
        (self.head + logical) % self.points.len()
    }

    /// Logical point `i` (0 is at the ball)
    pub fn get(&self, i: usize) -> Option<&TrailPoint> {
        if i >= self.points.len() {
            return None;
        }
        self.points.get(self.physical(i))
    }

    /// Points from the ball to the tail
    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> + '_ {
        (0..self.points.len()).map(move |i| &self.points[self.physical(i)])
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.iter().map(|p| p.pos).collect()
    }

    /// Advance one frame with the ball at `ball_pos` (orbit angle `ball_angle`)
    pub fn update(&mut self, ball_pos: Vec2, ball_angle: f32, center: Vec2) {
        let n = self.points.len();
        if n == 0 {
            return;
        }

        let current = TrailPoint {
            pos: ball_pos,
            angle: ball_angle,
        };
        let (velocity, d_angle) = match self.prev {
            Some(prev) => (
                ball_pos.distance(prev.pos),
                angle_delta(prev.angle, ball_angle),
            ),
            None => (0.0, 0.0),
        };
        self.prev = Some(current);

        if !self.primed {
            self.points.fill(current);
            self.head = 0;
            self.primed = true;
        }

        // Cascading shift: rotating the head back one slot makes every
        // logical point i hold what point i - 1 held. The old tail is the
        // slot that gets overwritten.
        self.head = (self.head + n - 1) % n;
        self.points[self.head] = current;

        let outward = ball_pos - center;
        let base_angle = outward.y.atan2(outward.x);
        let bend = if velocity > MOVING_THRESHOLD {
            d_angle * ROTATION_CURVE
        } else {
            0.0
        };

        for i in 1..n {
            let distance = i as f32 * self.spacing;
            let peak = (i as f32 / CURVE_PEAK_INDEX).min(1.0);
            let angle = base_angle + bend * (peak * PI).sin() * CURVE_AMPLITUDE;
            let target = ball_pos + Vec2::new(angle.cos(), angle.sin()) * distance;

            // Points near the head converge faster
            let factor = self.lerp * (1.0 - i as f32 / n as f32);
            let idx = self.physical(i);
            let point = &mut self.points[idx];
            point.pos += (target - point.pos) * factor;
        }
    }

    /// Ribbon geometry for drawing, `None` when there is nothing to draw
    pub fn ribbon(&self, ball_radius: f32) -> Option<TrailRibbon> {
        let n = self.points.len();
        if n < 2 || !self.primed {
            return None;
        }
        let pts = self.positions();

        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        for i in 0..n {
            let progress = i as f32 / (n - 1) as f32;
            let half_width = ball_radius * width_multiplier(progress);

            let tangent = pts[(i + 1).min(n - 1)] - pts[i.saturating_sub(1)];
            let len = tangent.length();
            let normal = if len > 0.0 {
                Vec2::new(-tangent.y, tangent.x) / len
            } else {
                Vec2::new(-tangent.y, tangent.x)
            };
            left.push(pts[i] - normal * half_width);
            right.push(pts[i] + normal * half_width);
        }

        let mut edges = RibbonEdges { left, right };
        let mut glow = Vec::with_capacity(GLOW_LAYERS as usize);
        for g in (1..=GLOW_LAYERS).rev() {
            glow.push(GlowLayer {
                alpha: GLOW_ALPHA_STEP * g as f32,
                edges: edges.clone(),
            });
            edges.expand(GLOW_EXPAND);
        }

        Some(TrailRibbon { body: edges, glow })
    }
}

/// Width profile: narrow at the ball, full in the middle, tapering at the tail
pub fn width_multiplier(progress: f32) -> f32 {
    if progress < 0.3 {
        0.5 + (progress / 0.3) * 0.5
    } else if progress < 0.7 {
        1.0
    } else {
        1.0 - ((progress - 0.7) / 0.3) * 0.7
    }
}

/// Ribbon opacity at `progress` along the trail, interpolating `GRADIENT_STOPS`
pub fn gradient_alpha(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    for pair in GRADIENT_STOPS.windows(2) {
        let (t0, a0) = pair[0];
        let (t1, a1) = pair[1];
        if t <= t1 {
            let u = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let a = a0 as f32 + (a1 as f32 - a0 as f32) * u;
            return a / 255.0;
        }
    }
    GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1 as f32 / 255.0
}

/// Left/right outline of a ribbon, head first
#[derive(Debug, Clone, Serialize)]
pub struct RibbonEdges {
    pub left: Vec<Vec2>,
    pub right: Vec<Vec2>,
}

impl RibbonEdges {
    /// Widen about the centerline
    fn expand(&mut self, factor: f32) {
        for (l, r) in self.left.iter_mut().zip(self.right.iter_mut()) {
            let mid = (*l + *r) * 0.5;
            let half = *l - mid;
            *l = mid + half * factor;
            *r = mid - half * factor;
        }
    }

    /// Closed polygon: right edge tail-to-head, then left edge head-to-tail
    pub fn polygon(&self) -> Vec<Vec2> {
        self.right
            .iter()
            .rev()
            .chain(self.left.iter())
            .copied()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GlowLayer {
    pub alpha: f32,
    pub edges: RibbonEdges,
}

/// Everything a renderer needs to draw the trail
#[derive(Debug, Clone, Serialize)]
pub struct TrailRibbon {
    /// Main ribbon, filled with the `GRADIENT_STOPS` opacity ramp
    pub body: RibbonEdges,
    /// Soft underlay, drawn first
    pub glow: Vec<GlowLayer>,
}
