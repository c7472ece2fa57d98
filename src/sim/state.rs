//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context: items, player, vitals,
//! quiz progress, timers and the RNG all live here and are passed into the
//! tick functions.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{fall_interval, spawn_interval};
use super::quiz::{Quiz, QuizTracker};
use super::timer::Timers;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not on the game screen (home, instructions, leaderboard)
    Menu,
    /// Active gameplay
    Playing,
    /// Paused while a quiz is on screen
    Quiz,
    /// Run ended
    GameOver,
}

/// Kinds of falling items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Black ant, small score
    CommonFood,
    /// Golden ant, big score
    RareFood,
    /// Trap, costs a life unless shielded
    Hazard,
    /// Temporary hazard immunity
    ShieldPickup,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::CommonFood,
        ItemKind::RareFood,
        ItemKind::Hazard,
        ItemKind::ShieldPickup,
    ];

    /// Asset name used by the HTML shell
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::CommonFood => "BlackAnt",
            ItemKind::RareFood => "GoldenAnt",
            ItemKind::Hazard => "Trap",
            ItemKind::ShieldPickup => "Shield",
        }
    }
}

/// An item falling straight down the play field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    /// Horizontal position in percent of field width, fixed at spawn
    pub x: f32,
    /// Vertical position, grows as the item falls
    pub y: f32,
    pub kind: ItemKind,
}

impl FallingItem {
    /// Return this item moved down by `step`
    #[inline]
    pub fn fallen(self, step: f32) -> Self {
        Self {
            y: self.y + step,
            ..self
        }
    }
}

/// The pangolin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Horizontal position, same space as item x
    pub x: f32,
    /// Bounce height, non-zero right after eating something
    pub jump_offset: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_START_X,
            jump_offset: 0.0,
        }
    }
}

impl Player {
    pub fn set_x(&mut self, x: f32) {
        self.x = crate::clamp_player_x(x);
    }
}

/// Score, lives and shield: the state that collision effects change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub score: u64,
    pub lives: u8,
    pub max_lives: u8,
    /// Whole seconds of shield left (0 = unshielded)
    pub shield_secs_left: u32,
    /// Set once the last life is gone
    pub game_over: bool,
}

impl Vitals {
    pub fn new(lives: u8, max_lives: u8) -> Self {
        Self {
            score: 0,
            lives: lives.min(max_lives),
            max_lives,
            shield_secs_left: 0,
            game_over: false,
        }
    }

    pub fn shielded(&self) -> bool {
        self.shield_secs_left > 0
    }

    /// Take one life; true when none are left
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Give one life back, up to the cap; true if a life was added
    pub fn restore_life(&mut self) -> bool {
        if self.lives < self.max_lives {
            self.lives += 1;
            true
        } else {
            false
        }
    }
}

/// Notifications for the presentation layer (sounds, animations, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Ate { kind: ItemKind, points: u32 },
    ShieldActivated,
    ShieldExpired,
    /// A hazard was eaten while shielded
    HazardBlocked,
    LifeLost { lives_left: u8 },
    LifeRestored { lives: u8 },
    Bounce,
    QuizOpened { quiz_id: u32 },
    QuizClosed,
    GameOver { score: u64 },
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (spawns, quiz selection)
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Active items, in spawn order
    pub items: Vec<FallingItem>,
    pub player: Player,
    pub vitals: Vitals,
    pub quiz: QuizTracker,
    pub timers: Timers,
    /// Virtual milliseconds simulated since the session started
    pub time_ms: f64,
    /// Pending notifications, drained by the host
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
    /// Balance change waiting for the next `start`
    pending_tuning: Option<Tuning>,
    /// The final score of this run was already handed out
    score_claimed: bool,
}

impl GameState {
    /// Create a new game state with the given seed, sitting in the menu
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            vitals: Vitals::new(tuning.start_lives, tuning.max_lives),
            quiz: QuizTracker::new(tuning.quiz_milestone),
            tuning,
            phase: GamePhase::Menu,
            items: Vec::new(),
            player: Player::default(),
            timers: Timers::default(),
            time_ms: 0.0,
            events: Vec::new(),
            next_id: 1,
            pending_tuning: None,
            score_claimed: false,
        }
    }

    /// Supply quiz content (kept across restarts)
    pub fn set_quiz_bank(&mut self, bank: Vec<Quiz>) {
        self.quiz.set_bank(bank);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Begin a fresh run: clear items, reset vitals and quiz progress, arm timers
    pub fn start(&mut self) {
        if let Some(tuning) = self.pending_tuning.take() {
            self.quiz.set_milestone(tuning.quiz_milestone);
            self.tuning = tuning;
            log::info!("Applied new tuning");
        }
        self.score_claimed = false;
        self.timers.cancel_all();
        self.items.clear();
        self.events.clear();
        self.player = Player::default();
        self.vitals = Vitals::new(self.tuning.start_lives, self.tuning.max_lives);
        self.quiz.reset();
        self.time_ms = 0.0;
        self.phase = GamePhase::Playing;
        self.sync_timers();
        log::info!("Game started (seed {})", self.seed);
    }

    /// Leave the game screen; nothing keeps running
    pub fn leave(&mut self) {
        self.timers.cancel_all();
        self.player.jump_offset = 0.0;
        self.phase = GamePhase::Menu;
        log::info!("Left game screen");
    }

    /// Queue a balance change; the current run keeps its values
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.pending_tuning = Some(tuning.sanitized());
    }

    /// The final score, once per game over
    ///
    /// Returns `None` while the run is still going or if already claimed.
    pub fn claim_final_score(&mut self) -> Option<u64> {
        if self.phase != GamePhase::GameOver || self.score_claimed {
            return None;
        }
        self.score_claimed = true;
        Some(self.vitals.score)
    }

    pub fn score(&self) -> u64 {
        self.vitals.score
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Match timers to the phase and the current score
    ///
    /// In play, the fall and spawn timers follow the difficulty curves and are
    /// restarted whenever their period changes. Outside play they are cancelled.
    pub fn sync_timers(&mut self) {
        if self.phase != GamePhase::Playing {
            self.timers.cancel_play();
            return;
        }
        let score = self.vitals.score as f64;
        self.timers.fall.sync(fall_interval(score));
        self.timers.spawn.sync(spawn_interval(score));
        self.timers.collision.sync(self.tuning.collision_period_ms);
    }

    /// Enter game over: every timer stops
    pub(crate) fn end_game(&mut self) {
        self.timers.cancel_all();
        self.player.jump_offset = 0.0;
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.vitals.score,
        });
        log::info!("Game over with score {}", self.vitals.score);
    }
}
