//! Item generator
//!
//! Picks a kind from the score-dependent weights and a spawn column inside
//! the inset range. The RNG is always passed in, never global.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::difficulty::item_weights;
use super::state::{FallingItem, ItemKind};
use crate::tuning::Tuning;

/// Sample an item kind from the weights at this score
pub fn sample_kind<R: Rng + ?Sized>(score: f64, rng: &mut R) -> ItemKind {
    let weights = item_weights(score);
    match WeightedIndex::new(weights.as_array()) {
        Ok(dist) => ItemKind::ALL[dist.sample(rng)],
        // Unreachable with the shipped curves (common food is always weighted)
        Err(e) => {
            log::warn!("Bad item weights {:?}: {}", weights, e);
            ItemKind::CommonFood
        }
    }
}

/// Build a new item at the top of the field
pub fn generate<R: Rng + ?Sized>(score: f64, rng: &mut R, id: u32, tuning: &Tuning) -> FallingItem {
    let kind = sample_kind(score, rng);
    let x = rng.random_range(tuning.spawn_x_min..tuning.spawn_x_max);
    FallingItem {
        id,
        x,
        y: tuning.spawn_y,
        kind,
    }
}
