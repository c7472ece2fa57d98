//! Effect boundary between the collision detector and the state holders
//!
//! The detector never touches score, lives or shield directly; it reports
//! hits through an `EffectSink`. Every method defaults to a no-op so a sink
//! only implements what it cares about, and `()` is a valid (silent) sink.

/// Receiver of collision effects
pub trait EffectSink {
    fn on_score_increase(&mut self, _amount: u32) {}

    /// A life was lost; return true if the game should end
    fn on_life_lost(&mut self) -> bool {
        false
    }

    fn on_shield_activated(&mut self) {}

    /// Fired at most once per collision pass
    fn on_game_over(&mut self) {}

    /// Visual "jump" when something good is eaten
    fn on_bounce_cue(&mut self) {}
}

impl EffectSink for () {}

/// One effect notification, as recorded by `EffectLog`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScoreIncrease(u32),
    LifeLost,
    ShieldActivated,
    GameOver,
    BounceCue,
}

/// Sink that records effects in order, with a scripted life counter
#[derive(Debug, Clone, Default)]
pub struct EffectLog {
    pub effects: Vec<Effect>,
    /// Lives the log pretends to hold; `on_life_lost` reports zero
    pub lives: u8,
}

impl EffectLog {
    pub fn with_lives(lives: u8) -> Self {
        Self {
            effects: Vec::new(),
            lives,
        }
    }

    pub fn count(&self, effect: Effect) -> usize {
        self.effects.iter().filter(|&&e| e == effect).count()
    }

    pub fn total_score(&self) -> u64 {
        self.effects
            .iter()
            .map(|e| match e {
                Effect::ScoreIncrease(amount) => *amount as u64,
                _ => 0,
            })
            .sum()
    }
}

impl EffectSink for EffectLog {
    fn on_score_increase(&mut self, amount: u32) {
        self.effects.push(Effect::ScoreIncrease(amount));
    }

    fn on_life_lost(&mut self) -> bool {
        self.effects.push(Effect::LifeLost);
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    fn on_shield_activated(&mut self) {
        self.effects.push(Effect::ShieldActivated);
    }

    fn on_game_over(&mut self) {
        self.effects.push(Effect::GameOver);
    }

    fn on_bounce_cue(&mut self) {
        self.effects.push(Effect::BounceCue);
    }
}
