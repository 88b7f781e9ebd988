//! Ring content generation
//!
//! Every ring carries the ball's current color on exactly one segment, so a
//! correct answer always exists. Segment widths come from curated unequal
//! splits: a narrow correct segment is harder to hit than a wide one.

use std::f32::consts::TAU;

use rand::Rng;
use rand::seq::SliceRandom;

use super::segment::Segment;
use super::state::Ring;
use crate::palette::{Color, PALETTE};
use crate::tuning::Tuning;

/// Width splits (percent of the circle) by segment count
const RATIOS_2: [[f32; 2]; 3] = [[80.0, 20.0], [70.0, 30.0], [60.0, 40.0]];
const RATIOS_3: [[f32; 3]; 3] = [[50.0, 30.0, 20.0], [40.0, 35.0, 25.0], [45.0, 30.0, 25.0]];
const RATIOS_4: [[f32; 4]; 3] = [
    [40.0, 30.0, 20.0, 10.0],
    [35.0, 25.0, 25.0, 15.0],
    [30.0, 25.0, 25.0, 20.0],
];

/// Two segments while learning, then 2-4 uniformly
pub fn segment_count_for_score<R: Rng + ?Sized>(rng: &mut R, score: u64, easy_threshold: u64) -> usize {
    if score > easy_threshold {
        rng.random_range(2..=4)
    } else {
        2
    }
}

/// Pick a width split for `count` segments, in percent
///
/// Counts without a curated table split the circle evenly.
pub fn pick_ratios<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<f32> {
    match count {
        2 => RATIOS_2[rng.random_range(0..RATIOS_2.len())].to_vec(),
        3 => RATIOS_3[rng.random_range(0..RATIOS_3.len())].to_vec(),
        4 => RATIOS_4[rng.random_range(0..RATIOS_4.len())].to_vec(),
        0 => Vec::new(),
        n => vec![100.0 / n as f32; n],
    }
}

/// Choose `count` colors: the ball color once, the rest distinct, then shuffled
pub fn pick_colors<R: Rng + ?Sized>(rng: &mut R, ball_color: Color, count: usize) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }
    let others: Vec<Color> = PALETTE.iter().copied().filter(|&c| c != ball_color).collect();
    let mut pool = others.clone();

    let mut colors = Vec::with_capacity(count);
    colors.push(ball_color);
    while colors.len() < count {
        if pool.is_empty() {
            // Palette exhausted: repeats are allowed from here on
            if others.is_empty() {
                colors.push(ball_color);
                continue;
            }
            pool = others.clone();
        }
        let idx = rng.random_range(0..pool.len());
        colors.push(pool.remove(idx));
    }

    colors.shuffle(rng);
    colors
}

/// Turn percent widths and colors into contiguous segments starting at 0
///
/// Boundaries are computed from the running percentage so rounding never
/// opens a gap, and the last segment always closes exactly at 2π.
pub fn layout_segments(ratios: &[f32], colors: &[Color]) -> Vec<Segment> {
    let total: f32 = ratios.iter().sum();
    if ratios.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(ratios.len());
    let mut cumulative = 0.0;
    for (i, ratio) in ratios.iter().enumerate() {
        let start = cumulative / total * TAU;
        cumulative += ratio;
        let end = if i + 1 == ratios.len() {
            TAU
        } else {
            cumulative / total * TAU
        };
        let color = colors.get(i).copied().unwrap_or(PALETTE[i % PALETTE.len()]);
        segments.push(Segment::new(start, end, color));
    }
    segments
}

/// Build the next ring for the current ball color and score
pub fn generate_ring<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    ball_color: Color,
    score: u64,
    speed: f32,
    tuning: &Tuning,
) -> Ring {
    let count = segment_count_for_score(rng, score, tuning.easy_score_threshold);
    let colors = pick_colors(rng, ball_color, count);
    let ratios = pick_ratios(rng, count);
    let segments = layout_segments(&ratios, &colors);
    log::trace!("ring {id}: {count} segments, ratios {ratios:?}");
    Ring::new(id, segments, speed)
}
