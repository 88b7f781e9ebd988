//! Browser bindings
//!
//! The page owns the canvas, audio and input listeners. It calls `step` once
//! per animation frame and draws from `snapshot_json`.

use wasm_bindgen::prelude::*;

use super::GameHost;
use crate::persistence::LocalStorage;
use crate::sim::{Command, Viewport};
use crate::tuning::Tuning;

#[wasm_bindgen]
pub struct WebGame {
    host: GameHost<LocalStorage>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game sized to the canvas. A zero seed uses the clock.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, width: f32, height: f32) -> WebGame {
        super::init_logging();
        let seed = if seed == 0 {
            js_sys::Date::now() as u64
        } else {
            seed
        };
        let host = GameHost::new(
            seed,
            Tuning::default(),
            Viewport::new(width, height),
            LocalStorage::new(),
        );
        WebGame { host }
    }

    pub fn start(&mut self) {
        self.host.command(Command::Start);
    }

    pub fn restart(&mut self) {
        self.host.command(Command::Restart);
    }

    #[wasm_bindgen(js_name = toggleAudio)]
    pub fn toggle_audio(&mut self) {
        self.host.command(Command::ToggleAudio);
    }

    /// Arrow keys, drag and swipe handlers all funnel into this
    pub fn rotate(&mut self, delta: f32) {
        self.host.rotate(delta);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.host.state.resize(width, height);
    }

    #[wasm_bindgen(js_name = showTutorial)]
    pub fn show_tutorial(&self) -> bool {
        self.host.should_show_tutorial()
    }

    #[wasm_bindgen(js_name = dismissTutorial)]
    pub fn dismiss_tutorial(&mut self) {
        self.host.acknowledge_tutorial();
    }

    /// Advance one frame; returns the frame's events as JSON
    pub fn step(&mut self) -> Result<String, JsValue> {
        let events = self.host.frame();
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.host.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
