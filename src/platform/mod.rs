//! Platform abstraction layer
//!
//! `GameHost` is the glue every front end shares: it owns the simulation, a
//! storage backend, the player's records and settings, and reacts to the
//! events a frame produces (persisting best scores, remembering the music
//! toggle). Browser bindings live in `web`.

use crate::persistence::KeyValueStore;
use crate::records::Records;
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GameState, RenderSnapshot, TickInput, Viewport, tick};
use crate::tuning::Tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Initialize logging for the current platform
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Initialize logging for the current platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// A running game bound to a storage backend
pub struct GameHost<S: KeyValueStore> {
    pub state: GameState,
    pub records: Records,
    pub settings: Settings,
    store: S,
    /// Input accumulated between frames
    pending: TickInput,
}

impl<S: KeyValueStore> GameHost<S> {
    pub fn new(seed: u64, mut tuning: Tuning, viewport: Viewport, store: S) -> Self {
        let records = Records::load(&store);
        let settings = Settings::load(&store);
        settings.apply_to(&mut tuning);
        for warning in tuning.validate() {
            log::warn!("tuning: {warning}");
        }

        let mut state = GameState::new(seed, tuning, viewport, records.best_score);
        state.session.music_enabled = settings.music_enabled;
        log::info!("Game initialized with seed: {seed}");

        Self {
            state,
            records,
            settings,
            store,
            pending: TickInput::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Accumulate rotation from the input boundary
    pub fn rotate(&mut self, delta: f32) {
        if delta.is_finite() {
            self.pending.angle_delta += delta;
        }
    }

    /// Queue a command for the next frame (the latest one wins)
    pub fn command(&mut self, command: Command) {
        self.pending.command = Some(command);
    }

    /// True until the how-to-play panel has been acknowledged
    pub fn should_show_tutorial(&self) -> bool {
        self.records.first_visit
    }

    pub fn acknowledge_tutorial(&mut self) {
        self.records.mark_visited(&mut self.store);
    }

    /// Run one frame with the queued input
    pub fn frame(&mut self) -> Vec<GameEvent> {
        let input = std::mem::take(&mut self.pending);
        let events = tick(&mut self.state, &input);
        for event in &events {
            self.on_event(event);
        }
        events
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::GameOver { score, .. } => {
                self.records.record_score(&mut self.store, score);
            }
            GameEvent::AudioToggled { enabled } => {
                self.settings.music_enabled = enabled;
                self.settings.save(&mut self.store);
            }
            _ => {}
        }
    }
}
