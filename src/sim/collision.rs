//! Collision detection between falling items and the pangolin
//!
//! An item is eaten when it is horizontally close to the player and inside
//! the collision band near the bottom of the field. Effects are reported to
//! an `EffectSink`; the caller commits the retained items afterwards.

use serde::{Deserialize, Serialize};

use super::effects::EffectSink;
use super::state::{FallingItem, ItemKind};
use crate::tuning::Tuning;

/// Player state sampled at the start of a collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionProbe {
    pub player_x: f32,
    pub shielded: bool,
}

/// What eating an item did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    Eaten { points: u32 },
    ShieldPickedUp,
    /// Hazard eaten while shielded
    HazardBlocked,
    HazardHit,
}

/// Result of one collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionResult {
    /// Items left in play, order preserved
    pub retained: Vec<FallingItem>,
    /// Items eaten this pass, in processing order
    pub hits: Vec<(FallingItem, HitOutcome)>,
    /// The sink asked to end the game
    pub game_over: bool,
}

/// Inside the open band `(top, bottom)`
#[inline]
pub fn in_collision_band(y: f32, tuning: &Tuning) -> bool {
    y > tuning.collision_band_top && y < tuning.collision_band_bottom
}

#[inline]
pub fn is_hit(item: &FallingItem, player_x: f32, tuning: &Tuning) -> bool {
    (item.x - player_x).abs() < tuning.collision_dx && in_collision_band(item.y, tuning)
}

/// Classify an item against the player; `None` means no contact
pub fn classify(item: &FallingItem, probe: &CollisionProbe, tuning: &Tuning) -> Option<HitOutcome> {
    if !is_hit(item, probe.player_x, tuning) {
        return None;
    }
    Some(match item.kind {
        ItemKind::CommonFood => HitOutcome::Eaten {
            points: tuning.common_food_points,
        },
        ItemKind::RareFood => HitOutcome::Eaten {
            points: tuning.rare_food_points,
        },
        ItemKind::ShieldPickup => HitOutcome::ShieldPickedUp,
        ItemKind::Hazard if probe.shielded => HitOutcome::HazardBlocked,
        ItemKind::Hazard => HitOutcome::HazardHit,
    })
}

/// Run one collision pass over `items`
///
/// Every hit is removed and its effect sent to `sink`, in item order. Once the
/// sink reports the game should end, `on_game_over` fires and later hits are
/// still removed but have no effect.
pub fn collision_pass<S: EffectSink + ?Sized>(
    items: &[FallingItem],
    probe: &CollisionProbe,
    tuning: &Tuning,
    sink: &mut S,
) -> CollisionResult {
    let mut result = CollisionResult {
        retained: Vec::with_capacity(items.len()),
        ..Default::default()
    };

    for item in items {
        let Some(outcome) = classify(item, probe, tuning) else {
            result.retained.push(*item);
            continue;
        };

        log::debug!(
            "Collision: {:?} at x={:.1} y={:.1}, player x={:.1}",
            item.kind,
            item.x,
            item.y,
            probe.player_x
        );
        result.hits.push((*item, outcome));

        if result.game_over {
            continue;
        }

        match outcome {
            HitOutcome::Eaten { points } => {
                sink.on_bounce_cue();
                sink.on_score_increase(points);
            }
            HitOutcome::ShieldPickedUp => {
                sink.on_bounce_cue();
                sink.on_shield_activated();
            }
            HitOutcome::HazardBlocked => {}
            HitOutcome::HazardHit => {
                if sink.on_life_lost() {
                    sink.on_game_over();
                    result.game_over = true;
                }
            }
        }
    }

    result
}
