//! Pangolin Feast entry point
//!
//! On the web the page drives `WebGame` directly. Natively this runs a
//! headless session with a simple autopilot, which is handy for checking
//! balance changes.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pangolin Feast (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(pangolin_feast::platform::random_seed);

    let summary = autopilot::run(seed, autopilot::SESSION_LIMIT_MS);
    println!(
        "seed {} | score {} | {:.1}s survived | {} quizzes",
        seed,
        summary.score,
        summary.time_ms / 1000.0,
        summary.quizzes
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebGame, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use pangolin_feast::sim::{
        FallingItem, GameEvent, GamePhase, GameState, ItemKind, Quiz, TickInput, advance, answer_quiz, close_quiz,
    };

    /// One display frame
    const FRAME_MS: f64 = 16.0;
    /// Give up after ten virtual minutes
    pub const SESSION_LIMIT_MS: f64 = 600_000.0;

    pub struct Summary {
        pub score: u64,
        pub time_ms: f64,
        pub quizzes: u32,
    }

    /// Questions used when no bank is supplied
    pub fn builtin_quizzes() -> Vec<Quiz> {
        let quiz = |id, question: &str, options: [&str; 3], correct_answer_index| Quiz {
            id,
            question: question.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_index,
        };
        vec![
            quiz(1, "What do pangolins mostly eat?", ["Ants and termites", "Fruit", "Fish"], 0),
            quiz(2, "What covers a pangolin's body?", ["Fur", "Scales", "Feathers"], 1),
            quiz(3, "What does a pangolin do when threatened?", ["Runs up a tree", "Roars", "Rolls into a ball"], 2),
            quiz(4, "How does a pangolin catch insects?", ["A long sticky tongue", "Sharp teeth", "Its tail"], 0),
        ]
    }

    /// Play one session to game over (or the time limit)
    pub fn run(seed: u64, limit_ms: f64) -> Summary {
        let mut state = GameState::new(seed);
        state.set_quiz_bank(builtin_quizzes());
        state.start();
        play(&mut state, limit_ms)
    }

    /// Drive a started game with the autopilot, answering every quiz correctly
    pub fn play(state: &mut GameState, limit_ms: f64) -> Summary {
        let mut quizzes = 0;
        while state.phase != GamePhase::GameOver && state.time_ms < limit_ms {
            if state.phase == GamePhase::Quiz {
                quizzes += 1;
                let correct = state.quiz.current().map(|quiz| quiz.correct_answer_index);
                answer_quiz(state, correct.unwrap_or(0));
                close_quiz(state);
            }

            let input = TickInput {
                player_x: steer(&state.items, state.player.x),
            };
            advance(state, &input, FRAME_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::QuizOpened { quiz_id } => log::debug!("Autopilot answering quiz {}", quiz_id),
                    GameEvent::LifeRestored { lives } => log::debug!("Life restored, {} now", lives),
                    _ => {}
                }
            }
        }

        Summary {
            score: state.score(),
            time_ms: state.time_ms,
            quizzes,
        }
    }

    /// Head for the lowest item worth catching, away from hazards
    fn steer(items: &[FallingItem], player_x: f32) -> Option<f32> {
        let target = items
            .iter()
            .filter(|item| item.kind != ItemKind::Hazard && item.y < 100.0)
            .max_by(|a, b| a.y.total_cmp(&b.y))?;
        let dodge = items
            .iter()
            .filter(|item| item.kind == ItemKind::Hazard && item.y > 60.0 && item.y < 100.0)
            .any(|hazard| (hazard.x - target.x).abs() < 8.0 && hazard.y > target.y);
        if dodge {
            return Some(if player_x < 50.0 { player_x + 20.0 } else { player_x - 20.0 });
        }
        Some(target.x)
    }

}
