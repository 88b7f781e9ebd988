//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per frame, fixed-step
//! - Seeded RNG only (owned by `GameState`)
//! - Stable iteration order (rings oldest first, resolved newest first)
//! - No rendering or platform dependencies; hosts read a `RenderSnapshot`

pub mod collision;
pub mod effects;
pub mod generator;
pub mod motion;
pub mod segment;
pub mod snapshot;
pub mod starfield;
pub mod state;
pub mod tick;
pub mod trail;

pub use collision::{HitOutcome, classify_ring, in_hit_band, points_for_combo};
pub use effects::{Effects, Particle, ScorePopup};
pub use generator::generate_ring;
pub use segment::Segment;
pub use snapshot::RenderSnapshot;
pub use starfield::{Star, StarTrail, Starfield};
pub use state::{Ball, GamePhase, GameState, Ring, Session, Viewport};
pub use tick::{Command, GameEvent, TickInput, tick};
pub use trail::{FluidTrail, TrailPoint, TrailRibbon};
