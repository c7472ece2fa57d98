//! Pangolin Feast - a falling-items arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, spawning, collisions, timers)
//! - `tuning`: Data-driven game balance
//! - `leaderboard`: Top scores persisted to LocalStorage
//! - `settings`: Player preferences
//! - `platform`: Browser/native platform abstraction
//! - `web`: wasm-bindgen bridge for the HTML shell (wasm32 only)

pub mod leaderboard;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use leaderboard::Leaderboard;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Play field is measured in percent of its width, 0 (left) to 100 (right)
    pub const FIELD_WIDTH: f32 = 100.0;

    /// Items never spawn flush against the edges
    pub const SPAWN_X_MIN: f32 = 10.0;
    pub const SPAWN_X_MAX: f32 = 90.0;
    /// Items start just above the top edge
    pub const SPAWN_Y: f32 = -10.0;

    /// Vertical distance an item falls per fall tick
    pub const FALL_STEP: f32 = 1.0;
    /// Items at or below this are gone
    pub const OFFSCREEN_Y: f32 = 500.0;

    /// Player movement range (the pointer is clamped to it)
    pub const PLAYER_X_MIN: f32 = 10.0;
    pub const PLAYER_X_MAX: f32 = 90.0;
    pub const PLAYER_START_X: f32 = 50.0;

    /// Horizontal reach of the player's mouth
    pub const COLLISION_DX: f32 = 8.0;
    /// Open vertical band where items can be eaten
    pub const COLLISION_BAND_TOP: f32 = 80.0;
    pub const COLLISION_BAND_BOTTOM: f32 = 100.0;
    /// Collision pass period (ms), faster than any fall tick below 5 units of travel
    pub const COLLISION_PERIOD_MS: f64 = 50.0;

    /// Score per item
    pub const COMMON_FOOD_POINTS: u32 = 1;
    pub const RARE_FOOD_POINTS: u32 = 10;

    /// Lives
    pub const START_LIVES: u8 = 1;
    pub const MAX_LIVES: u8 = 3;

    /// Shield lasts this many whole seconds, counted down once per second
    pub const SHIELD_DURATION_SECS: u32 = 10;
    pub const SHIELD_COUNTDOWN_MS: f64 = 1000.0;

    /// Bounce cue lifts the player this far for this long
    pub const BOUNCE_HEIGHT: f32 = 10.0;
    pub const BOUNCE_DURATION_MS: f64 = 150.0;

    /// A quiz opens every time the score crosses a multiple of this
    pub const QUIZ_MILESTONE: u64 = 50;

    /// Floors for the difficulty curves (ms)
    pub const MIN_FALL_INTERVAL_MS: f64 = 5.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 300.0;

    /// Longest stretch of virtual time a single `advance` call will simulate
    pub const MAX_ADVANCE_MS: f64 = 1000.0;
}

/// Clamp a horizontal position into the player's reachable range
#[inline]
pub fn clamp_player_x(x: f32) -> f32 {
    if x.is_nan() {
        return consts::PLAYER_START_X;
    }
    x.clamp(consts::PLAYER_X_MIN, consts::PLAYER_X_MAX)
}

/// Score as a non-negative real, with garbage mapped to zero
#[inline]
pub fn sanitize_score(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else if score == f64::INFINITY {
        f64::MAX
    } else {
        0.0
    }
}
