//! Virtual-time timers
//!
//! Every periodic behaviour of the game (falling, spawning, collision passes,
//! shield countdown, bounce reset) is a timer owned by a single `Timers` set.
//! The set is driven by `advance` in `tick.rs`, which fires due timers in
//! chronological order. Nothing runs while a timer is cancelled.

use serde::{Deserialize, Serialize};

/// Shortest period a timer accepts (ms)
pub const MIN_PERIOD_MS: f64 = 1.0;

/// Periods closer than this are considered unchanged
const PERIOD_EPSILON: f64 = 1e-9;

/// Identifies a timer in the set. Declaration order breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    Fall,
    Spawn,
    Collision,
    Shield,
    Bounce,
}

impl TimerKind {
    pub const ALL: [TimerKind; 5] = [
        TimerKind::Fall,
        TimerKind::Spawn,
        TimerKind::Collision,
        TimerKind::Shield,
        TimerKind::Bounce,
    ];
}

/// Clamp a requested period into something that can't busy-loop
#[inline]
pub fn clamp_period(period_ms: f64) -> f64 {
    if period_ms.is_finite() {
        period_ms.max(MIN_PERIOD_MS)
    } else if period_ms == f64::INFINITY {
        f64::MAX
    } else {
        MIN_PERIOD_MS
    }
}

/// A single timer: periodic, or one-shot when `repeat` is false
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    period_ms: f64,
    until_fire_ms: f64,
    armed: bool,
    repeat: bool,
}

impl Timer {
    pub const fn periodic() -> Self {
        Self {
            period_ms: 0.0,
            until_fire_ms: 0.0,
            armed: false,
            repeat: true,
        }
    }

    pub const fn one_shot() -> Self {
        Self {
            period_ms: 0.0,
            until_fire_ms: 0.0,
            armed: false,
            repeat: false,
        }
    }

    /// Start a fresh countdown, discarding any progress
    pub fn arm(&mut self, period_ms: f64) {
        let period_ms = clamp_period(period_ms);
        self.period_ms = period_ms;
        self.until_fire_ms = period_ms;
        self.armed = true;
    }

    /// Re-arm only if the period changed (or the timer isn't running)
    ///
    /// Returns true when the countdown was restarted.
    pub fn sync(&mut self, period_ms: f64) -> bool {
        let period_ms = clamp_period(period_ms);
        if self.armed && (self.period_ms - period_ms).abs() <= PERIOD_EPSILON {
            return false;
        }
        self.arm(period_ms);
        true
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.until_fire_ms = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn period_ms(&self) -> Option<f64> {
        self.armed.then_some(self.period_ms)
    }

    /// Time left before the next firing
    pub fn remaining_ms(&self) -> Option<f64> {
        self.armed.then_some(self.until_fire_ms.max(0.0))
    }

    fn elapse(&mut self, ms: f64) {
        if self.armed {
            self.until_fire_ms -= ms;
        }
    }

    /// Called when the timer fires: reload periodic, disarm one-shot
    fn complete(&mut self) {
        if self.repeat {
            self.until_fire_ms = self.period_ms;
        } else {
            self.cancel();
        }
    }
}

/// All timers of a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    pub fall: Timer,
    pub spawn: Timer,
    pub collision: Timer,
    pub shield: Timer,
    pub bounce: Timer,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            fall: Timer::periodic(),
            spawn: Timer::periodic(),
            collision: Timer::periodic(),
            shield: Timer::periodic(),
            bounce: Timer::one_shot(),
        }
    }
}

impl Timers {
    pub fn get(&self, kind: TimerKind) -> &Timer {
        match kind {
            TimerKind::Fall => &self.fall,
            TimerKind::Spawn => &self.spawn,
            TimerKind::Collision => &self.collision,
            TimerKind::Shield => &self.shield,
            TimerKind::Bounce => &self.bounce,
        }
    }

    pub fn get_mut(&mut self, kind: TimerKind) -> &mut Timer {
        match kind {
            TimerKind::Fall => &mut self.fall,
            TimerKind::Spawn => &mut self.spawn,
            TimerKind::Collision => &mut self.collision,
            TimerKind::Shield => &mut self.shield,
            TimerKind::Bounce => &mut self.bounce,
        }
    }

    /// Stop the three gameplay timers (fall, spawn, collision)
    pub fn cancel_play(&mut self) {
        self.fall.cancel();
        self.spawn.cancel();
        self.collision.cancel();
    }

    /// Stop everything
    pub fn cancel_all(&mut self) {
        for kind in TimerKind::ALL {
            self.get_mut(kind).cancel();
        }
    }

    pub fn active_count(&self) -> usize {
        TimerKind::ALL
            .iter()
            .filter(|&&kind| self.get(kind).is_armed())
            .count()
    }

    /// The earliest armed timer and how long until it fires
    pub fn next_due(&self) -> Option<(TimerKind, f64)> {
        let mut best: Option<(TimerKind, f64)> = None;
        for kind in TimerKind::ALL {
            if let Some(wait) = self.get(kind).remaining_ms() {
                // Strict comparison keeps declaration order on ties
                if best.is_none_or(|(_, best_wait)| wait < best_wait) {
                    best = Some((kind, wait));
                }
            }
        }
        best
    }

    /// Let time pass on every armed timer
    pub fn elapse(&mut self, ms: f64) {
        for kind in TimerKind::ALL {
            self.get_mut(kind).elapse(ms);
        }
    }

    /// Mark a due timer as fired
    pub fn complete(&mut self, kind: TimerKind) {
        self.get_mut(kind).complete();
    }
}
