//! Timer-driven simulation loop
//!
//! `advance` moves virtual time forward and fires every due timer in
//! chronological order. Each timer callback is one indivisible transition
//! over the game state.

use super::collision::{CollisionProbe, HitOutcome, collision_pass};
use super::effects::EffectSink;
use super::spawn::generate;
use super::state::{FallingItem, GameEvent, GamePhase, GameState, Player, Vitals};
use super::timer::{TimerKind, Timers};
use crate::consts::*;
use crate::tuning::Tuning;

/// Rounding slack when comparing accumulated times
const TIME_EPSILON_MS: f64 = 1e-6;

/// Input sampled by the host before an `advance`
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch position in percent of field width
    pub player_x: Option<f32>,
}

/// Advance the game by `dt_ms` of virtual time
pub fn advance(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if let Some(x) = input.player_x {
        state.player.set_x(x);
    }

    let mut remaining = if dt_ms.is_nan() {
        0.0
    } else {
        dt_ms.clamp(0.0, MAX_ADVANCE_MS)
    };

    while let Some((kind, wait)) = state.timers.next_due() {
        // Timers due at the very end of the window still fire
        if wait > remaining + TIME_EPSILON_MS {
            break;
        }
        let wait = wait.min(remaining);
        state.timers.elapse(wait);
        state.time_ms += wait;
        remaining -= wait;

        state.timers.complete(kind);
        fire(state, kind);
    }

    state.timers.elapse(remaining);
    state.time_ms += remaining;
}

fn fire(state: &mut GameState, kind: TimerKind) {
    match kind {
        TimerKind::Fall => fall_tick(state),
        TimerKind::Spawn => spawn_tick(state),
        TimerKind::Collision => collision_tick(state),
        TimerKind::Shield => shield_tick(state),
        TimerKind::Bounce => state.player.jump_offset = 0.0,
    }
}

/// Move every item down one step and drop the ones past the bottom
pub fn fall_items(items: &[FallingItem], step: f32, offscreen_y: f32) -> Vec<FallingItem> {
    items
        .iter()
        .map(|item| item.fallen(step))
        .filter(|item| item.y < offscreen_y)
        .collect()
}

pub fn fall_tick(state: &mut GameState) {
    state.items = fall_items(&state.items, state.tuning.fall_step, state.tuning.offscreen_y);
}

pub fn spawn_tick(state: &mut GameState) {
    let id = state.next_entity_id();
    let item = generate(state.vitals.score as f64, &mut state.rng, id, &state.tuning);
    state.items.push(item);
}

/// Routes collision effects into the parts of the game state they change
struct StateSink<'a> {
    vitals: &'a mut Vitals,
    player: &'a mut Player,
    timers: &'a mut Timers,
    events: &'a mut Vec<GameEvent>,
    tuning: &'a Tuning,
}

impl EffectSink for StateSink<'_> {
    fn on_score_increase(&mut self, amount: u32) {
        self.vitals.score = self.vitals.score.saturating_add(amount as u64);
    }

    fn on_life_lost(&mut self) -> bool {
        let out = self.vitals.lose_life();
        self.events.push(GameEvent::LifeLost {
            lives_left: self.vitals.lives,
        });
        log::info!("Life lost, {} left", self.vitals.lives);
        out
    }

    fn on_shield_activated(&mut self) {
        self.vitals.shield_secs_left = self.tuning.shield_duration_secs;
        self.timers.shield.arm(SHIELD_COUNTDOWN_MS);
        self.events.push(GameEvent::ShieldActivated);
    }

    fn on_game_over(&mut self) {
        self.vitals.game_over = true;
    }

    fn on_bounce_cue(&mut self) {
        self.player.jump_offset = BOUNCE_HEIGHT;
        self.timers.bounce.arm(self.tuning.bounce_duration_ms);
        self.events.push(GameEvent::Bounce);
    }
}

pub fn collision_tick(state: &mut GameState) {
    let probe = CollisionProbe {
        player_x: state.player.x,
        shielded: state.vitals.shielded(),
    };

    let result = {
        let mut sink = StateSink {
            vitals: &mut state.vitals,
            player: &mut state.player,
            timers: &mut state.timers,
            events: &mut state.events,
            tuning: &state.tuning,
        };
        collision_pass(&state.items, &probe, &state.tuning, &mut sink)
    };

    for (item, outcome) in &result.hits {
        match *outcome {
            HitOutcome::Eaten { points } => state.events.push(GameEvent::Ate {
                kind: item.kind,
                points,
            }),
            HitOutcome::HazardBlocked => state.events.push(GameEvent::HazardBlocked),
            HitOutcome::ShieldPickedUp | HitOutcome::HazardHit => {}
        }
    }

    // Effects are in; now commit the surviving items
    state.items = result.retained;

    if result.game_over {
        state.end_game();
        return;
    }

    if state.quiz.is_due(state.vitals.score) {
        open_quiz(state);
    }
    state.sync_timers();
}

fn shield_tick(state: &mut GameState) {
    if state.vitals.shield_secs_left <= 1 {
        state.vitals.shield_secs_left = 0;
        state.timers.shield.cancel();
        state.events.push(GameEvent::ShieldExpired);
    } else {
        state.vitals.shield_secs_left -= 1;
    }
}

fn open_quiz(state: &mut GameState) {
    let score = state.vitals.score;
    let Some(quiz_id) = state.quiz.open(score, &mut state.rng).map(|quiz| quiz.id) else {
        return;
    };
    state.phase = GamePhase::Quiz;
    state.timers.cancel_play();
    state.events.push(GameEvent::QuizOpened { quiz_id });
    log::info!("Quiz {} opened at score {}", quiz_id, score);
}

/// Answer the open quiz; a correct first answer restores a life
///
/// Returns whether the answer was correct, or `None` if it didn't count.
pub fn answer_quiz(state: &mut GameState, choice: usize) -> Option<bool> {
    if state.phase != GamePhase::Quiz {
        return None;
    }
    let correct = state.quiz.answer(choice)?;
    if correct && state.vitals.restore_life() {
        state.events.push(GameEvent::LifeRestored {
            lives: state.vitals.lives,
        });
    }
    Some(correct)
}

/// Dismiss the quiz and resume play on a fresh schedule
pub fn close_quiz(state: &mut GameState) {
    if state.phase != GamePhase::Quiz {
        return;
    }
    state.quiz.close();
    state.phase = GamePhase::Playing;
    state.sync_timers();
    state.events.push(GameEvent::QuizClosed);
    log::info!("Quiz closed, resuming");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::{fall_interval, spawn_interval};
    use crate::sim::quiz::sample_bank;
    use crate::sim::state::ItemKind;

    fn at_player(state: &mut GameState, kind: ItemKind) {
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            x: state.player.x,
            y: 90.0,
            kind,
        });
    }

    fn run(state: &mut GameState, total_ms: f64) {
        let mut left = total_ms;
        while left > 0.0 {
            let step = left.min(MAX_ADVANCE_MS);
            advance(state, &TickInput::default(), step);
            left -= step;
        }
    }

    #[test]
    fn test_items_fall_and_expire() {
        let items = [
            FallingItem { id: 1, x: 30.0, y: 10.0, kind: ItemKind::CommonFood },
            FallingItem { id: 2, x: 40.0, y: 499.0, kind: ItemKind::Hazard },
        ];
        let fallen = fall_items(&items, FALL_STEP, OFFSCREEN_Y);
        assert_eq!(fallen.len(), 1);
        assert_eq!(fallen[0].id, 1);
        assert_eq!(fallen[0].y, 11.0);
        assert_eq!(fallen[0].x, 30.0);
    }

    #[test]
    fn test_first_spawn_after_one_interval() {
        let mut state = GameState::new(12345);
        state.start();
        run(&mut state, spawn_interval(0.0) - 1.0);
        assert!(state.items.is_empty());
        run(&mut state, 2.0);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].y, SPAWN_Y);
    }

    #[test]
    fn test_items_advance_on_fall_timer() {
        let mut state = GameState::new(12345);
        state.start();
        state.items.push(FallingItem { id: 999, x: 20.0, y: 0.0, kind: ItemKind::RareFood });
        state.player.set_x(80.0);

        run(&mut state, fall_interval(0.0) * 3.0 + 1.0);

        let item = state.items.iter().find(|i| i.id == 999).expect("still falling");
        assert_eq!(item.y, 3.0);
    }

    #[test]
    fn test_common_food_scenario() {
        let mut state = GameState::new(12345);
        state.start();
        advance(&mut state, &TickInput { player_x: Some(50.0) }, 0.0);
        at_player(&mut state, ItemKind::CommonFood);

        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);

        assert_eq!(state.score(), COMMON_FOOD_POINTS as u64);
        assert!(state.items.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Ate { kind: ItemKind::CommonFood, points: 1 }));
        assert!(events.contains(&GameEvent::Bounce));
        assert_eq!(state.player.jump_offset, BOUNCE_HEIGHT);

        advance(&mut state, &TickInput::default(), BOUNCE_DURATION_MS);
        assert_eq!(state.player.jump_offset, 0.0);
    }

    /// Drop one item from the spawn row onto a waiting player and report
    /// whether it was eaten before leaving the band
    fn falls_into_mouth(start_score: u64, seed: u64) -> bool {
        // Keep random spawns well away from the player
        let tuning = Tuning {
            spawn_x_min: 85.0,
            spawn_x_max: 90.0,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(seed, tuning);
        state.start();
        state.vitals.score = start_score;
        state.sync_timers();
        advance(&mut state, &TickInput { player_x: Some(20.0) }, 0.0);
        state.items.push(FallingItem { id: 9000, x: 20.0, y: SPAWN_Y, kind: ItemKind::CommonFood });

        let mut guard = 0;
        while state.items.iter().any(|item| item.id == 9000) && guard < 10_000 {
            advance(&mut state, &TickInput::default(), 16.0);
            guard += 1;
        }

        let eaten = state.score() == start_score + COMMON_FOOD_POINTS as u64;
        let leftover = state.items.iter().any(|item| item.id == 9000);
        eaten && !leftover
    }

    #[test]
    fn test_falling_item_caught_at_slow_speed() {
        assert!(falls_into_mouth(0, 11));
    }

    #[test]
    fn test_falling_item_caught_at_top_speed() {
        assert!(fall_interval(300.0) < 11.0);
        assert!(falls_into_mouth(300, 11));
        assert!(falls_into_mouth(1_000, 12));
    }

    #[test]
    fn test_score_change_rearms_timers() {
        let mut state = GameState::new(1);
        state.start();
        at_player(&mut state, ItemKind::RareFood);

        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);

        assert_eq!(state.score(), 10);
        assert_eq!(state.timers.fall.period_ms(), Some(fall_interval(10.0)));
        assert_eq!(state.timers.spawn.period_ms(), Some(spawn_interval(10.0)));
        // Fresh countdown, not the remainder of the old one
        assert_eq!(state.timers.fall.remaining_ms(), Some(fall_interval(10.0)));
    }

    #[test]
    fn test_last_life_lost_ends_game() {
        let mut state = GameState::new(3);
        state.start();
        state.items.push(FallingItem { id: 500, x: 20.0, y: 10.0, kind: ItemKind::CommonFood });
        at_player(&mut state, ItemKind::Hazard);

        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.vitals.lives, 0);
        assert_eq!(state.timers.active_count(), 0);
        let game_overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);

        // Nothing moves after game over
        run(&mut state, 5000.0);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].y, 10.0);
    }

    #[test]
    fn test_spare_life_keeps_playing() {
        let tuning = Tuning {
            start_lives: 2,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(3, tuning);
        state.start();
        at_player(&mut state, ItemKind::Hazard);

        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.vitals.lives, 1);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_shield_absorbs_hazard_then_expires() {
        let mut state = GameState::new(8);
        state.start();
        at_player(&mut state, ItemKind::ShieldPickup);
        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);
        assert!(state.vitals.shielded());
        assert_eq!(state.vitals.shield_secs_left, SHIELD_DURATION_SECS);

        at_player(&mut state, ItemKind::Hazard);
        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);
        assert_eq!(state.vitals.lives, START_LIVES);
        assert!(state.items.is_empty());
        assert!(state.drain_events().contains(&GameEvent::HazardBlocked));

        // Freeze gameplay so only the shield countdown runs
        state.timers.cancel_play();
        run(&mut state, 9_900.0);
        assert!(state.vitals.shielded());
        run(&mut state, 100.0);
        assert!(!state.vitals.shielded());
        assert!(!state.timers.shield.is_armed());
        assert!(state.drain_events().contains(&GameEvent::ShieldExpired));
    }

    #[test]
    fn test_second_shield_refreshes_countdown() {
        let mut state = GameState::new(8);
        state.start();
        at_player(&mut state, ItemKind::ShieldPickup);
        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);
        state.timers.cancel_play();
        run(&mut state, 4_000.0);
        assert_eq!(state.vitals.shield_secs_left, SHIELD_DURATION_SECS - 4);

        at_player(&mut state, ItemKind::ShieldPickup);
        collision_tick(&mut state);
        assert_eq!(state.vitals.shield_secs_left, SHIELD_DURATION_SECS);
        assert_eq!(state.timers.shield.remaining_ms(), Some(SHIELD_COUNTDOWN_MS));
    }

    #[test]
    fn test_quiz_pause_and_recovery() {
        let mut state = GameState::new(21);
        state.set_quiz_bank(sample_bank(2));
        state.start();
        state.vitals.score = 49;
        state.items.push(FallingItem { id: 700, x: 20.0, y: 10.0, kind: ItemKind::CommonFood });
        at_player(&mut state, ItemKind::CommonFood);

        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);

        assert_eq!(state.score(), 50);
        assert_eq!(state.phase, GamePhase::Quiz);
        assert!(!state.timers.fall.is_armed());
        assert!(!state.timers.spawn.is_armed());
        assert!(!state.timers.collision.is_armed());

        // Frozen while the quiz is up
        run(&mut state, 5_000.0);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].y, 10.0);

        assert_eq!(answer_quiz(&mut state, 0), Some(true));
        assert_eq!(answer_quiz(&mut state, 0), None);
        assert_eq!(state.vitals.lives, START_LIVES + 1);

        close_quiz(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.timers.fall.remaining_ms(), Some(fall_interval(50.0)));
        assert_eq!(state.timers.collision.remaining_ms(), Some(COLLISION_PERIOD_MS));

        // Same milestone doesn't reopen
        at_player(&mut state, ItemKind::CommonFood);
        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_wrong_answer_keeps_lives() {
        let mut state = GameState::new(21);
        state.set_quiz_bank(sample_bank(1));
        state.start();
        state.vitals.score = 45;
        at_player(&mut state, ItemKind::RareFood);
        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);
        assert_eq!(state.phase, GamePhase::Quiz);

        assert_eq!(answer_quiz(&mut state, 2), Some(false));
        assert_eq!(state.vitals.lives, START_LIVES);
    }

    #[test]
    fn test_leave_stops_everything() {
        let mut state = GameState::new(4);
        state.start();
        at_player(&mut state, ItemKind::ShieldPickup);
        advance(&mut state, &TickInput::default(), COLLISION_PERIOD_MS);
        assert!(state.timers.active_count() > 3);

        state.leave();
        state.leave();
        assert_eq!(state.timers.active_count(), 0);
        let before = state.items.clone();
        run(&mut state, 3_000.0);
        assert_eq!(state.items, before);
    }

    #[test]
    fn test_restart_clears_run() {
        let mut state = GameState::new(4);
        state.start();
        run(&mut state, 3_000.0);
        state.vitals.score = 33;
        state.start();
        assert!(state.items.is_empty());
        assert_eq!(state.score(), 0);
        assert_eq!(state.vitals.lives, START_LIVES);
        assert_eq!(state.timers.active_count(), 3);
    }

    #[test]
    fn test_item_ids_unique_over_a_run() {
        let mut state = GameState::new(77);
        state.start();
        advance(&mut state, &TickInput { player_x: Some(10.0) }, 0.0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            run(&mut state, 1_000.0);
            for item in &state.items {
                seen.insert(item.id);
            }
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        let ids: Vec<u32> = state.items.iter().map(|i| i.id).collect();
        let unique: std::collections::HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert!(!seen.is_empty());
    }

    #[test]
    fn test_degenerate_dt() {
        let mut state = GameState::new(5);
        state.start();
        advance(&mut state, &TickInput::default(), -100.0);
        advance(&mut state, &TickInput::default(), f64::NAN);
        assert_eq!(state.time_ms, 0.0);
        advance(&mut state, &TickInput::default(), 1e12);
        assert!((state.time_ms - MAX_ADVANCE_MS).abs() < 1e-6);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start();
        state2.start();

        let inputs = [Some(20.0), None, Some(70.0), Some(45.0), None];
        for _ in 0..10 {
            for x in inputs {
                let input = TickInput { player_x: x };
                advance(&mut state1, &input, 333.0);
                advance(&mut state2, &input, 333.0);
            }
        }

        assert_eq!(state1.items, state2.items);
        assert_eq!(state1.vitals, state2.vitals);
        assert_eq!(state1.phase, state2.phase);
    }
}
