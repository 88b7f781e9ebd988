//! Whole-session scenarios driven through the public API

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use color_ring::consts::{HIT_BAND_NEAR_Z, HIT_PLANE_Z};
use color_ring::persistence::{KeyValueStore, MemoryStore};
use color_ring::platform::GameHost;
use color_ring::records::BEST_SCORE_KEY;
use color_ring::sim::{
    Command, GameEvent, GamePhase, GameState, RenderSnapshot, Ring, Segment, TickInput, Viewport,
    tick,
};
use color_ring::{Color, PALETTE, Tuning, angle_delta, normalize_angle};

fn new_state(seed: u64) -> GameState {
    GameState::new(seed, Tuning::default(), Viewport::default(), 0)
}

fn command(c: Command) -> TickInput {
    TickInput {
        command: Some(c),
        ..Default::default()
    }
}

fn other_color(color: Color) -> Color {
    PALETTE
        .iter()
        .copied()
        .find(|c| *c != color)
        .unwrap()
}

/// Push a ring that enters the hit band on the next tick
fn push_incoming(state: &mut GameState, segments: Vec<Segment>) -> u32 {
    let id = state.next_ring_id();
    let mut ring = Ring::new(id, segments, 6.0);
    ring.z = HIT_PLANE_Z + 2.0;
    state.rings.push(ring);
    id
}

fn push_match(state: &mut GameState) -> u32 {
    let color = state.ball.color;
    push_incoming(state, vec![Segment::new(0.0, TAU, color)])
}

/// Ball sits at angle 0, so the ball's color is put on the far half
fn push_miss(state: &mut GameState) -> u32 {
    let color = state.ball.color;
    push_incoming(
        state,
        vec![
            Segment::new(0.0, PI, other_color(color)),
            Segment::new(PI, TAU, color),
        ],
    )
}

fn run_until_game_over(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..=state.tuning.game_over_delay_frames {
        events.extend(tick(state, &TickInput::default()));
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
    events
}

/// Turn toward the matching segment of the next ring to resolve
fn steer(state: &GameState) -> f32 {
    state
        .rings
        .iter()
        .filter(|r| r.z > HIT_BAND_NEAR_Z)
        .min_by(|a, b| a.z.total_cmp(&b.z))
        .and_then(|r| r.segments.iter().find(|s| s.color == state.ball.color))
        .map(|s| angle_delta(normalize_angle(state.ball.angle), s.mid_angle()).clamp(-0.15, 0.15))
        .unwrap_or(0.0)
}

#[test]
fn restart_resets_the_session() {
    let mut state = new_state(21);
    tick(&mut state, &command(Command::Start));

    push_match(&mut state);
    tick(&mut state, &TickInput::default());
    assert_eq!(state.session.score, 1);
    assert_eq!(state.session.combo, 1);
    assert!(state.session.ring_speed > state.tuning.ring_speed_start);

    push_miss(&mut state);
    tick(&mut state, &TickInput::default());
    assert_eq!(state.phase, GamePhase::GameOverDelay);
    assert_eq!(state.session.combo, 0);

    let events = run_until_game_over(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert!(events.contains(&GameEvent::GameOver {
        score: 1,
        max_combo: 1,
        new_best: true
    }));

    let events = tick(&mut state, &command(Command::Restart));
    assert!(events.contains(&GameEvent::SessionStarted));
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.session.score, 0);
    assert_eq!(state.session.combo, 0);
    assert_eq!(state.session.max_combo, 0);
    assert_eq!(state.session.best_score, 1);
    assert!(state.rings.is_empty());
    assert_eq!(state.ball.color, PALETTE[0]);
    assert_eq!(state.ball.angle, 0.0);
    assert_eq!(state.session.ring_speed, state.tuning.ring_speed_start);
    assert_eq!(state.session.spawn_interval, state.tuning.spawn_interval_start);
    assert!(!state.session.game_over_triggered);
}

#[test]
fn ring_speed_ramps_monotonically_to_the_cap() {
    let mut state = new_state(22);
    tick(&mut state, &command(Command::Start));

    let mut expected_score = 0u64;
    let mut last_speed = state.session.ring_speed;
    for combo in 1..=40u32 {
        push_match(&mut state);
        tick(&mut state, &TickInput::default());

        expected_score += 1 + (combo / 3) as u64;
        assert_eq!(state.session.combo, combo);
        assert_eq!(state.session.score, expected_score);
        assert!(state.session.ring_speed >= last_speed);
        assert!(state.session.ring_speed <= state.tuning.ring_speed_max);
        last_speed = state.session.ring_speed;
    }
    assert_eq!(state.session.ring_speed, state.tuning.ring_speed_max);
    assert_eq!(state.session.max_combo, 40);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn spawn_interval_decays_to_its_floor() {
    let mut state = new_state(23);
    tick(&mut state, &command(Command::Start));

    let mut spawned = 0;
    let mut last_interval = state.session.spawn_interval;
    for _ in 0..6000 {
        for event in tick(&mut state, &TickInput::default()) {
            if let GameEvent::RingSpawned { segments, .. } = event {
                spawned += 1;
                assert_eq!(segments, 2);
            }
        }
        // Nothing ever reaches the ball
        state.rings.clear();
        assert!(state.session.spawn_interval <= last_interval);
        assert!(state.session.spawn_interval >= state.tuning.spawn_interval_min);
        last_interval = state.session.spawn_interval;
    }
    assert!(spawned > 40);
    assert_eq!(state.session.spawn_interval, state.tuning.spawn_interval_min);
}

#[test]
fn each_ring_resolves_at_most_once() {
    let mut state = new_state(24);
    tick(&mut state, &command(Command::Start));

    let mut spawned = HashSet::new();
    let mut resolved = HashSet::new();
    let mut last_id = None;

    for frame in 0..12_000u32 {
        // Wobble a little so some rings are missed
        let wobble = if frame % 500 < 40 { 0.3 } else { 0.0 };
        let mut input = TickInput {
            angle_delta: steer(&state) + wobble,
            command: None,
        };
        if state.phase == GamePhase::GameOver {
            input.command = Some(Command::Restart);
        }

        for event in tick(&mut state, &input) {
            match event {
                GameEvent::RingSpawned { id, .. } => {
                    assert!(last_id.is_none_or(|last| id > last));
                    last_id = Some(id);
                    assert!(spawned.insert(id));
                }
                GameEvent::RingMatched { id, .. } => {
                    assert!(spawned.contains(&id));
                    assert!(resolved.insert(id));
                    assert!(state.rings.iter().all(|r| r.id != id));
                }
                GameEvent::RingMissed { id, .. } => {
                    assert!(spawned.contains(&id));
                    assert!(resolved.insert(id));
                }
                _ => {}
            }
        }

        for ring in &state.rings {
            assert!(ring.z >= 100.0 - ring.speed);
        }
    }
    assert!(!resolved.is_empty());
}

#[test]
fn identical_inputs_give_identical_runs() {
    let script = |frame: u32| TickInput {
        angle_delta: ((frame as f32) * 0.05).sin() * 0.12,
        command: match frame {
            0 => Some(Command::Start),
            f if f % 700 == 0 => Some(Command::Restart),
            _ => None,
        },
    };

    let mut a = new_state(777);
    let mut b = new_state(777);
    for frame in 0..4000 {
        let ea = tick(&mut a, &script(frame));
        let eb = tick(&mut b, &script(frame));
        assert_eq!(ea, eb);
    }

    let snap_a = serde_json::to_string(&RenderSnapshot::capture(&a)).unwrap();
    let snap_b = serde_json::to_string(&RenderSnapshot::capture(&b)).unwrap();
    assert_eq!(snap_a, snap_b);
    assert_eq!(a.session.score, b.session.score);
    assert_eq!(a.ball.angle, b.ball.angle);
}

#[test]
fn host_persists_best_score_on_game_over() {
    let mut host = GameHost::new(25, Tuning::default(), Viewport::default(), MemoryStore::new());
    host.command(Command::Start);
    host.frame();

    push_match(&mut host.state);
    push_match(&mut host.state);
    host.frame();
    assert_eq!(host.state.session.score, 2);

    push_miss(&mut host.state);
    host.frame();
    for _ in 0..host.state.tuning.game_over_delay_frames {
        host.frame();
    }
    assert_eq!(host.state.phase, GamePhase::GameOver);
    assert_eq!(host.records.best_score, 2);
    assert_eq!(host.store().get(BEST_SCORE_KEY).as_deref(), Some("2"));

    let reopened = GameHost::new(26, Tuning::default(), Viewport::default(), host.store().clone());
    assert_eq!(reopened.state.session.best_score, 2);
}
