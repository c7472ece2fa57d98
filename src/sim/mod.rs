//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual time only (timers advanced by the host)
//! - Seeded RNG only
//! - Stable iteration order (items kept in spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod quiz;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{CollisionProbe, CollisionResult, HitOutcome, collision_pass};
pub use difficulty::{ItemWeights, fall_interval, item_weights, spawn_interval};
pub use effects::{Effect, EffectLog, EffectSink};
pub use quiz::{Quiz, QuizTracker};
pub use spawn::generate;
pub use state::{FallingItem, GameEvent, GamePhase, GameState, ItemKind, Player, Vitals};
pub use tick::{TickInput, advance, answer_quiz, close_quiz};
pub use timer::{Timer, TimerKind, Timers};
