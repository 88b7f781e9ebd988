//! Read-only view of the simulation for renderers and HUDs
//!
//! Captured once per frame after `tick`. Everything here is plain data with
//! resolved screen positions, alphas and sizes, so a presentation layer never
//! reaches back into `GameState`.

use glam::Vec2;
use serde::Serialize;

use super::segment::Segment;
use super::state::{GamePhase, GameState};
use super::trail::TrailRibbon;
use crate::palette::{COMBO_GOLD, Color};

#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Trail samples from the ball to the tail
    pub trail: Vec<Vec2>,
    pub ribbon: Option<TrailRibbon>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RingView {
    pub id: u32,
    /// Draw center including shake jitter
    pub center: Vec2,
    pub z: f32,
    pub scale: f32,
    pub radius: f32,
    pub thickness: f32,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: Color,
    /// Remaining life in [0, 1], used as alpha
    pub life: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopupView {
    pub pos: Vec2,
    pub color: Color,
    pub alpha: f32,
    pub text: String,
    /// "Nx COMBO!" label drawn below the points, in `combo_color`
    pub combo_text: Option<String>,
    pub combo_color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarView {
    pub pos: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarTrailView {
    pub pos: Vec2,
    pub alpha: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub center: Vec2,
    pub score: u64,
    pub best_score: u64,
    pub combo: u32,
    pub music_enabled: bool,
    /// Hidden in the menu and while the miss effects play
    pub ball: Option<BallView>,
    /// Oldest first; draw in order
    pub rings: Vec<RingView>,
    pub explosions: Vec<ParticleView>,
    pub bursts: Vec<ParticleView>,
    pub popups: Vec<PopupView>,
    pub stars: Vec<StarView>,
    pub star_trails: Vec<StarTrailView>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let center = state.center();
        let in_game = state.phase != GamePhase::Menu;

        let ball = (in_game && state.phase != GamePhase::GameOverDelay).then(|| BallView {
            pos: state.ball_position(),
            radius: state.ball.radius,
            color: state.ball.color,
            trail: state.ball.trail.positions(),
            ribbon: state.ball.trail.ribbon(state.ball.radius),
        });

        let (rings, explosions, bursts, popups) = if in_game {
            let rings = state
                .rings
                .iter()
                .map(|r| RingView {
                    id: r.id,
                    center: center + r.shake_offset,
                    z: r.z,
                    scale: r.scale(),
                    radius: r.scaled_radius(),
                    thickness: r.scaled_thickness(),
                    segments: r.segments.clone(),
                })
                .collect();
            let particle = |p: &super::effects::Particle| ParticleView {
                pos: p.pos,
                color: p.color,
                life: p.life_ratio(),
                size: p.draw_size(),
            };
            let explosions = state.effects.explosions.iter().map(particle).collect();
            let bursts = state.effects.bursts.iter().map(particle).collect();
            let popups = state
                .effects
                .popups
                .iter()
                .map(|p| PopupView {
                    pos: p.pos,
                    color: p.color,
                    alpha: p.life_ratio(),
                    text: p.label(),
                    combo_text: p.combo_label(),
                    combo_color: COMBO_GOLD,
                })
                .collect();
            (rings, explosions, bursts, popups)
        } else {
            Default::default()
        };

        let stars = state
            .starfield
            .stars()
            .iter()
            .filter(|s| s.z > 0.0)
            .map(|s| StarView {
                pos: s.screen_pos,
                size: s.screen_size,
                alpha: s.alpha(),
                color: s.color,
            })
            .collect();
        let star_trails = state
            .starfield
            .trails()
            .iter()
            .map(|t| StarTrailView {
                pos: t.pos,
                alpha: t.alpha(),
            })
            .collect();

        Self {
            frame: state.frame,
            phase: state.phase,
            center,
            score: state.session.score,
            best_score: state.session.best_score,
            combo: state.session.combo,
            music_enabled: state.session.music_enabled,
            ball,
            rings,
            explosions,
            bursts,
            popups,
            stars,
            star_trails,
        }
    }

    /// The combo counter is only worth showing for real streaks
    pub fn show_combo(&self) -> bool {
        self.combo > 1
    }
}
