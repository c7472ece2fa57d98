//! wasm-bindgen bridge for the HTML shell
//!
//! The page owns rendering, audio and screens; it feeds pointer positions and
//! frame times in and reads state and events back as JSON.

use wasm_bindgen::prelude::*;

use crate::leaderboard::Leaderboard;
use crate::platform;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Quiz, TickInput, advance, answer_quiz, close_quiz};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Pangolin Feast starting...");
}

/// Game instance driven by the page's animation loop
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    settings: Settings,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = platform::random_seed();
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            state: GameState::new(seed),
            settings: Settings::load(),
            input: TickInput::default(),
        }
    }

    /// Replace balance values; takes effect on the next `start`
    pub fn set_tuning(&mut self, json: &str) {
        self.state.set_tuning(Tuning::from_json(json));
    }

    /// Load quiz content (a JSON array of quizzes); false if unreadable
    pub fn load_quizzes(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<Quiz>>(json) {
            Ok(bank) => {
                log::info!("Loaded {} quizzes", bank.len());
                self.state.set_quiz_bank(bank);
                true
            }
            Err(e) => {
                log::warn!("Invalid quiz JSON: {}", e);
                false
            }
        }
    }

    pub fn start(&mut self) {
        self.state.start();
    }

    /// Back to the home screen
    pub fn leave(&mut self) {
        self.state.leave();
    }

    /// Pointer position in percent of the play field width
    pub fn set_pointer(&mut self, x_percent: f32) {
        self.input.player_x = Some(x_percent);
    }

    /// Advance by one animation frame
    pub fn update(&mut self, dt_ms: f64) {
        let input = std::mem::take(&mut self.input);
        advance(&mut self.state, &input, dt_ms);
    }

    pub fn phase(&self) -> String {
        match self.state.phase {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Quiz => "quiz",
            GamePhase::GameOver => "gameover",
        }
        .to_string()
    }

    pub fn score(&self) -> f64 {
        self.state.vitals.score as f64
    }

    pub fn lives(&self) -> u8 {
        self.state.vitals.lives
    }

    pub fn shield_secs_left(&self) -> u32 {
        self.state.vitals.shield_secs_left
    }

    pub fn player_x(&self) -> f32 {
        self.state.player.x
    }

    pub fn jump_offset(&self) -> f32 {
        self.settings.displayed_jump(self.state.player.jump_offset)
    }

    /// Active items as JSON
    pub fn items_json(&self) -> String {
        serde_json::to_string(&self.state.items).unwrap_or_else(|_| "[]".to_string())
    }

    /// Pending events as JSON (cleared by this call)
    pub fn drain_events_json(&mut self) -> String {
        let events = self.state.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// The open quiz as JSON, if any
    pub fn current_quiz_json(&self) -> Option<String> {
        self.state
            .quiz
            .current()
            .and_then(|quiz| serde_json::to_string(quiz).ok())
    }

    pub fn answer_quiz(&mut self, choice: usize) -> Option<bool> {
        answer_quiz(&mut self.state, choice)
    }

    pub fn close_quiz(&mut self) {
        close_quiz(&mut self.state);
    }

    /// Record the finished run once; returns the rank reached
    pub fn save_score(&mut self) -> Option<u32> {
        let score = self.state.claim_final_score()?;
        Leaderboard::record(score).map(|rank| rank as u32)
    }

    pub fn leaderboard_json() -> String {
        serde_json::to_string(&Leaderboard::load()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn clear_leaderboard() {
        Leaderboard::clear();
    }

    pub fn toggle_sound(&mut self) -> bool {
        let off = self.settings.toggle_sound();
        self.settings.save();
        off
    }

    pub fn sound_off(&self) -> bool {
        self.settings.sound_off
    }

    pub fn sfx_volume(&self) -> f32 {
        self.settings.effective_sfx_volume()
    }

    pub fn music_volume(&self) -> f32 {
        self.settings.effective_music_volume()
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
