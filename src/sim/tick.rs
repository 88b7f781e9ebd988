//! Per-frame simulation step
//!
//! Core game loop that advances the simulation one frame. Phase flow:
//! `Menu -> Playing -> GameOverDelay -> GameOver -> (restart) -> Playing`.
//!
//! Ring resolution is split in two: `collision::classify_ring` produces a
//! `HitOutcome` and the reducers below apply it to the session.

use serde::{Deserialize, Serialize};

use super::collision::{self, HitOutcome};
use super::generator;
use super::motion;
use super::state::{GamePhase, GameState};
use crate::palette::{Color, PALETTE};

/// Host commands delivered alongside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Leave the menu and begin a session
    Start,
    /// Begin a fresh session from the game over screen
    Restart,
    /// Flip background music on/off
    ToggleAudio,
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Orbit rotation accumulated since the previous frame (radians)
    pub angle_delta: f32,
    pub command: Option<Command>,
}

/// Things that happened during a frame, for hosts that drive audio,
/// storage or HUD animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    RingSpawned { id: u32, segments: usize },
    RingMatched { id: u32, points: u32, combo: u32, color: Color },
    RingMissed { id: u32, combo_lost: u32 },
    GameOver { score: u64, max_combo: u32, new_best: bool },
    /// Background music should start (true) or stop (false)
    Music { playing: bool },
    AudioToggled { enabled: bool },
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if let Some(command) = input.command {
        apply_command(state, command, &mut events);
    }
    state.rotate_ball(input.angle_delta);
    state.frame += 1;

    // Background runs in every phase
    state
        .starfield
        .update(&mut state.rng, state.viewport, &state.tuning);

    if state.phase == GamePhase::Menu {
        return events;
    }

    let center = state.center();
    let ball_pos = state.ball_position();
    state.ball.trail.update(ball_pos, state.ball.angle, center);
    state.effects.update(&state.tuning);
    for ring in &mut state.rings {
        ring.update_shake(&mut state.rng, state.tuning.shake_frames, state.tuning.shake_decay);
    }

    if state.phase == GamePhase::GameOverDelay {
        state.session.game_over_delay = state.session.game_over_delay.saturating_sub(1);
        if state.session.game_over_delay == 0 {
            enter_game_over(state, &mut events);
            return events;
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    spawn_rings(state, &mut events);
    resolve_rings(state, &mut events);
    events
}

fn apply_command(state: &mut GameState, command: Command, events: &mut Vec<GameEvent>) {
    match (command, state.phase) {
        (Command::Start, GamePhase::Menu) | (Command::Restart, GamePhase::GameOver) => {
            start_session(state, events);
        }
        (Command::ToggleAudio, _) => {
            state.session.music_enabled = !state.session.music_enabled;
            log::info!(
                "Music {}",
                if state.session.music_enabled { "on" } else { "off" }
            );
            events.push(GameEvent::AudioToggled {
                enabled: state.session.music_enabled,
            });
        }
        (command, phase) => {
            log::debug!("Ignoring {:?} in phase {}", command, phase.as_str());
        }
    }
}

fn start_session(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.reset_session();
    log::info!("Session started (best {})", state.session.best_score);
    events.push(GameEvent::SessionStarted);
    if state.session.music_enabled {
        events.push(GameEvent::Music { playing: true });
    }
}

fn enter_game_over(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::GameOver;
    let session = &mut state.session;
    let new_best = session.score > session.best_score;
    if new_best {
        session.best_score = session.score;
    }
    log::info!(
        "Game over: score {} (max combo {}){}",
        session.score,
        session.max_combo,
        if new_best { " - new best!" } else { "" }
    );
    events.push(GameEvent::GameOver {
        score: session.score,
        max_combo: session.max_combo,
        new_best,
    });
    events.push(GameEvent::Music { playing: false });
}

/// Count frames and spawn a ring when the interval elapses
fn spawn_rings(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.session.spawn_timer += 1;
    if (state.session.spawn_timer as f32) < state.session.spawn_interval {
        return;
    }

    let id = state.next_ring_id();
    let ring = generator::generate_ring(
        &mut state.rng,
        id,
        state.ball.color,
        state.session.score,
        state.session.ring_speed,
        &state.tuning,
    );
    events.push(GameEvent::RingSpawned {
        id,
        segments: ring.segments.len(),
    });
    state.rings.push(ring);

    state.session.spawn_timer = 0;
    state.session.spawn_interval =
        motion::decay_spawn_interval(state.session.spawn_interval, &state.tuning);
}

/// Move every ring, resolve hits, drop rings past the near plane
///
/// Newest rings are processed first. A match keeps scanning; the first miss
/// ends the frame's scan, so rings behind it neither move nor get culled.
fn resolve_rings(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let center = state.center();
    let ball_pos = state.ball_position();

    let mut i = state.rings.len();
    while i > 0 {
        i -= 1;
        motion::advance_ring(&mut state.rings[i]);

        let outcome = collision::classify_ring(&state.rings[i], ball_pos, state.ball.color, center);
        match outcome {
            HitOutcome::Match { segment } => {
                reduce_match(state, i, segment, events);
                continue;
            }
            HitOutcome::Miss { .. } if !state.session.game_over_triggered => {
                reduce_miss(state, i, events);
                return;
            }
            _ => {}
        }

        if motion::past_near_plane(&state.rings[i]) {
            let ring = state.rings.remove(i);
            log::trace!("ring {} passed the near plane", ring.id);
        }
    }
}

fn reduce_match(state: &mut GameState, index: usize, segment: usize, events: &mut Vec<GameEvent>) {
    let ring = state.rings.remove(index);
    let segment_color = ring.segments[segment].color;
    let ball_pos = state.ball_position();
    let ball_color = state.ball.color;

    let session = &mut state.session;
    session.combo += 1;
    session.max_combo = session.max_combo.max(session.combo);
    let points = collision::points_for_combo(session.combo, &state.tuning);
    session.score += points as u64;
    let combo = session.combo;

    let tuning = &state.tuning;
    state
        .effects
        .spawn_burst(&mut state.rng, ball_pos, ball_color, tuning.burst_count, tuning);
    state
        .effects
        .spawn_popup(ball_pos, points, segment_color, combo, tuning);

    state.ball.color = next_ball_color(state);
    state.session.ring_speed = motion::ramp_speed(state.session.ring_speed, &state.tuning);

    log::debug!(
        "ring {} matched: +{} (combo {}, score {})",
        ring.id,
        points,
        combo,
        state.session.score
    );
    events.push(GameEvent::RingMatched {
        id: ring.id,
        points,
        combo,
        color: segment_color,
    });
}

fn reduce_miss(state: &mut GameState, index: usize, events: &mut Vec<GameEvent>) {
    let ball_pos = state.ball_position();
    let session = &mut state.session;
    session.game_over_triggered = true;
    let combo_lost = session.combo;
    session.combo = 0;
    session.game_over_delay = state.tuning.game_over_delay_frames.max(1);

    state
        .effects
        .spawn_explosion(&mut state.rng, ball_pos, state.ball.color, &state.tuning);
    let ring = &mut state.rings[index];
    ring.start_shake(state.tuning.shake_frames, state.tuning.shake_intensity);
    state.phase = GamePhase::GameOverDelay;

    log::debug!("ring {} missed with combo {}", ring.id, combo_lost);
    events.push(GameEvent::RingMissed {
        id: ring.id,
        combo_lost,
    });
}

/// Pick the ball's next color from the oldest queued ring
///
/// Prefers a color different from the current one; if the ring only carries
/// the current color any of its colors will do. With no ring queued the
/// palette is cycled.
fn next_ball_color(state: &mut GameState) -> Color {
    use rand::Rng;

    let current = state.ball.color;
    match state.rings.first() {
        Some(next) if !next.segments.is_empty() => {
            if let Some(seg) = next.segments.iter().find(|s| s.color != current) {
                seg.color
            } else {
                let idx = state.rng.random_range(0..next.segments.len());
                next.segments[idx].color
            }
        }
        _ => {
            state.session.color_index = (state.session.color_index + 1) % PALETTE.len();
            PALETTE[state.session.color_index]
        }
    }
}
