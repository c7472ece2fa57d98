//! Difficulty model
//!
//! Pure functions of the score. Speeds ramp up smoothly through a sum of
//! logistic steps centered on score milestones, so the game never jumps
//! from one speed to the next.

use serde::{Deserialize, Serialize};

use super::state::ItemKind;
use crate::consts::{MIN_FALL_INTERVAL_MS, MIN_SPAWN_INTERVAL_MS};
use crate::sanitize_score;

/// Steepness of every logistic step
const STEEPNESS: f64 = 0.1;

/// Base value minus a sum of logistic drops, floored
#[derive(Debug, Clone, Copy)]
pub struct SigmoidCurve {
    pub base: f64,
    pub floor: f64,
    /// (center score, size of the drop)
    pub steps: [(f64, f64); 4],
}

impl SigmoidCurve {
    pub fn eval(&self, score: f64) -> f64 {
        let score = sanitize_score(score);
        let drop: f64 = self
            .steps
            .iter()
            .map(|&(center, size)| size * logistic(STEEPNESS * (score - center)))
            .sum();
        let value = self.base - drop;
        if value.is_finite() {
            value.max(self.floor)
        } else {
            self.floor
        }
    }
}

#[inline]
fn logistic(t: f64) -> f64 {
    1.0 / (1.0 + (-t).exp())
}

/// Fall tick period: 70ms at the start, approaching 10ms
pub const FALL_CURVE: SigmoidCurve = SigmoidCurve {
    base: 70.0,
    floor: MIN_FALL_INTERVAL_MS,
    steps: [(50.0, 20.0), (100.0, 25.0), (150.0, 10.0), (200.0, 5.0)],
};

/// Spawn period: about one item per second at the start, never below 300ms
pub const SPAWN_CURVE: SigmoidCurve = SigmoidCurve {
    base: 1000.0,
    floor: MIN_SPAWN_INTERVAL_MS,
    steps: [(50.0, 250.0), (100.0, 250.0), (150.0, 150.0), (200.0, 100.0)],
};

/// Milliseconds between fall ticks at this score
pub fn fall_interval(score: f64) -> f64 {
    FALL_CURVE.eval(score)
}

/// Milliseconds between spawns at this score
pub fn spawn_interval(score: f64) -> f64 {
    SPAWN_CURVE.eval(score)
}

/// Relative spawn frequency of each item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWeights {
    pub common_food: u32,
    pub rare_food: u32,
    pub hazard: u32,
    pub shield: u32,
}

impl ItemWeights {
    pub fn total(&self) -> u32 {
        self.common_food + self.rare_food + self.hazard + self.shield
    }

    pub fn get(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::CommonFood => self.common_food,
            ItemKind::RareFood => self.rare_food,
            ItemKind::Hazard => self.hazard,
            ItemKind::ShieldPickup => self.shield,
        }
    }

    /// Weights in `ItemKind::ALL` order
    pub fn as_array(&self) -> [u32; 4] {
        ItemKind::ALL.map(|kind| self.get(kind))
    }
}

pub const COMMON_FOOD_WEIGHT: u32 = 10;
pub const HAZARD_BASE_WEIGHT: u32 = 1;
/// Hazards never exceed this multiple of their base weight
pub const HAZARD_MAX_MULTIPLE: u32 = 12;

/// Item weights at this score
pub fn item_weights(score: f64) -> ItemWeights {
    let score = sanitize_score(score);
    ItemWeights {
        common_food: COMMON_FOOD_WEIGHT,
        rare_food: if score < 100.0 { 2 } else { 1 },
        hazard: hazard_weight(score),
        shield: if score < 80.0 { 2 } else { 1 },
    }
}

fn hazard_weight(score: f64) -> u32 {
    // Bands get steeper as the score climbs: +1 per 25 points from 50,
    // +1 per 20 from 100, +1 per 10 from 200.
    let multiple = if score < 20.0 {
        1
    } else if score < 50.0 {
        2
    } else if score < 100.0 {
        2 + ((score - 50.0) / 25.0) as u32
    } else if score < 200.0 {
        4 + ((score - 100.0) / 20.0) as u32
    } else {
        8u32.saturating_add(((score - 200.0) / 10.0) as u32)
    };
    HAZARD_BASE_WEIGHT * multiple.min(HAZARD_MAX_MULTIPLE)
}
