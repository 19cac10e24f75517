//! drill-wasm - WebAssembly bindings that let a browser host drive training sessions.

use std::str::FromStr;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use drill_core::{ButtonLayout, Difficulty, InputEvent, Mode, Pattern, Symbol};
use drill_engine::{ConfigError, CustomConfig, TrainerConfig};
use drill_session::{
    MemoryStore, SessionController, SessionEvent, SessionRequest, SessionState, Settings,
    TrainerContext,
};

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct JsTrainer {
    inner: SessionController,
}

#[wasm_bindgen]
impl JsTrainer {
    #[wasm_bindgen(constructor)]
    pub fn new(six_button: bool) -> Result<JsTrainer, JsError> {
        Self::build(TrainerConfig::default(), six_button)
    }

    /// Trainer with timing and scoring overrides given as JSON.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str, six_button: bool) -> Result<JsTrainer, JsError> {
        Self::build(TrainerConfig::from_json(json)?, six_button)
    }

    pub fn start(
        &mut self,
        mode: &str,
        difficulty: &str,
        attempts: u32,
        now: f64,
        seed: u32,
    ) -> Result<u32, JsError> {
        let mode = Mode::from_str(mode).map_err(ConfigError::UnknownMode)?;
        let request =
            SessionRequest::new(mode, parse_difficulty(difficulty)?, attempts).with_seed(seed as u64);
        let id = self.inner.start(request, to_ms(now))?;
        Ok(id as u32)
    }

    /// Starts a custom session from `{ families: { basic, motions, combos }, duration_ms }`.
    #[wasm_bindgen(js_name = startCustom)]
    pub fn start_custom(
        &mut self,
        custom: JsValue,
        difficulty: &str,
        attempts: u32,
        now: f64,
        seed: u32,
    ) -> Result<u32, JsError> {
        let custom: CustomConfig = serde_wasm_bindgen::from_value(custom)?;
        let request = SessionRequest::new(Mode::Custom, parse_difficulty(difficulty)?, attempts)
            .with_custom(custom)
            .with_seed(seed as u64);
        let id = self.inner.start(request, to_ms(now))?;
        Ok(id as u32)
    }

    /// Starts a custom-combo session drilling one pattern, e.g. `"down, down_right, right, lp"`.
    #[wasm_bindgen(js_name = startCombo)]
    pub fn start_combo(
        &mut self,
        notation: &str,
        difficulty: &str,
        attempts: u32,
        now: f64,
    ) -> Result<u32, JsError> {
        let pattern = Pattern::parse(notation)?;
        let request = SessionRequest::new(Mode::CustomCombo, parse_difficulty(difficulty)?, attempts)
            .with_custom_combo(pattern);
        let id = self.inner.start(request, to_ms(now))?;
        Ok(id as u32)
    }

    /// Feeds a logical symbol such as `"lp"` or `"down_right"`. Unknown names are ignored.
    pub fn press(&mut self, symbol: &str, now: f64) -> JsValue {
        match Symbol::from_str(symbol) {
            Ok(symbol) => events_to_js(&self.inner.on_input(InputEvent::new(symbol, to_ms(now)))),
            Err(_) => JsValue::NULL,
        }
    }

    /// Feeds a raw key name through the active key map.
    #[wasm_bindgen(js_name = pressKey)]
    pub fn press_key(&mut self, key: &str, now: f64) -> JsValue {
        match self.inner.settings().keymap.resolve(key) {
            Some(symbol) => events_to_js(&self.inner.on_input(InputEvent::new(symbol, to_ms(now)))),
            None => JsValue::NULL,
        }
    }

    pub fn tick(&mut self, now: f64) -> JsValue {
        events_to_js(&self.inner.tick(to_ms(now)))
    }

    pub fn end(&mut self) -> JsValue {
        match self.inner.end() {
            Some(session) => to_js(&session),
            None => JsValue::NULL,
        }
    }

    /// How often the host should poll `progress`, in milliseconds.
    #[wasm_bindgen(js_name = progressIntervalMs)]
    pub fn progress_interval_ms(&self) -> u32 {
        self.inner.progress_interval_ms() as u32
    }

    pub fn state(&self) -> String {
        state_name(self.inner.state()).to_string()
    }

    pub fn score(&self) -> JsValue {
        match self.inner.score() {
            Some(score) => to_js(score),
            None => JsValue::NULL,
        }
    }

    pub fn progress(&self, now: f64) -> JsValue {
        match self.inner.progress(to_ms(now)) {
            Some(progress) => to_js(&progress),
            None => JsValue::NULL,
        }
    }

    pub fn report(&self) -> JsValue {
        match self.inner.report() {
            Some(report) => to_js(&report),
            None => JsValue::NULL,
        }
    }

    pub fn leaderboard(&self) -> JsValue {
        to_js(&self.inner.store().leaderboard())
    }

    /// Applies a relay state blob and returns `"waiting"` or `"active"`.
    #[wasm_bindgen(js_name = relayStatus)]
    pub fn relay_status(&mut self, projection: &str) -> Result<String, JsError> {
        let status = self.inner.apply_relay_projection(projection)?;
        Ok(to_js(&status).as_string().unwrap_or_default())
    }
}

impl JsTrainer {
    fn build(config: TrainerConfig, six_button: bool) -> Result<JsTrainer, JsError> {
        let layout = if six_button {
            ButtonLayout::Six
        } else {
            ButtonLayout::Four
        };
        let ctx = TrainerContext::new(config, Settings::new(layout))?;
        let inner = SessionController::new(ctx, Box::new(MemoryStore::new()))?;
        Ok(Self { inner })
    }
}

fn parse_difficulty(text: &str) -> Result<Difficulty, JsError> {
    Difficulty::from_str(text).map_err(|err| JsError::new(&err))
}

fn to_ms(now: f64) -> u64 {
    if now.is_finite() && now > 0.0 {
        now as u64
    } else {
        0
    }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Countdown => "countdown",
        SessionState::AwaitingInput => "awaiting_input",
        SessionState::Cooldown => "cooldown",
        SessionState::Completed => "completed",
    }
}

fn events_to_js(events: &[SessionEvent]) -> JsValue {
    to_js(&events)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}
