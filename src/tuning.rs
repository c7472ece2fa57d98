//! Data-driven game balance
//!
//! Every knob has a default from `consts`; a JSON document only needs the
//! fields it wants to change.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal spawn range (inset from the edges)
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,
    pub spawn_y: f32,

    pub fall_step: f32,
    pub offscreen_y: f32,

    pub collision_dx: f32,
    pub collision_band_top: f32,
    pub collision_band_bottom: f32,
    pub collision_period_ms: f64,

    pub common_food_points: u32,
    pub rare_food_points: u32,

    pub start_lives: u8,
    pub max_lives: u8,

    pub shield_duration_secs: u32,
    pub bounce_duration_ms: f64,

    pub quiz_milestone: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_x_min: SPAWN_X_MIN,
            spawn_x_max: SPAWN_X_MAX,
            spawn_y: SPAWN_Y,

            fall_step: FALL_STEP,
            offscreen_y: OFFSCREEN_Y,

            collision_dx: COLLISION_DX,
            collision_band_top: COLLISION_BAND_TOP,
            collision_band_bottom: COLLISION_BAND_BOTTOM,
            collision_period_ms: COLLISION_PERIOD_MS,

            common_food_points: COMMON_FOOD_POINTS,
            rare_food_points: RARE_FOOD_POINTS,

            start_lives: START_LIVES,
            max_lives: MAX_LIVES,

            shield_duration_secs: SHIELD_DURATION_SECS,
            bounce_duration_ms: BOUNCE_DURATION_MS,

            quiz_milestone: QUIZ_MILESTONE,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring invalid tuning JSON: {}", e);
                Self::default()
            }
        }
    }

    /// Repair values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.spawn_x_min < self.spawn_x_max)
            || self.spawn_x_min < 0.0
            || self.spawn_x_max > FIELD_WIDTH
        {
            self.spawn_x_min = defaults.spawn_x_min;
            self.spawn_x_max = defaults.spawn_x_max;
        }
        // Items must start above the band and leave the field below it
        if !(self.collision_band_top < self.collision_band_bottom)
            || !(self.spawn_y < self.collision_band_top)
            || !(self.collision_band_bottom <= self.offscreen_y)
        {
            self.spawn_y = defaults.spawn_y;
            self.collision_band_top = defaults.collision_band_top;
            self.collision_band_bottom = defaults.collision_band_bottom;
            self.offscreen_y = defaults.offscreen_y;
        }

        // A step as wide as the band could jump right over it
        let band = self.collision_band_bottom - self.collision_band_top;
        if !(self.fall_step > 0.0) {
            self.fall_step = defaults.fall_step;
        }
        if self.fall_step >= band {
            self.fall_step = band / 2.0;
        }

        if !(self.collision_period_ms > 0.0) {
            self.collision_period_ms = defaults.collision_period_ms;
        }
        // At the fastest fall speed an item must still be in the band for a
        // whole collision period
        let min_dwell_ms = band_dwell_ms(band, self.fall_step);
        if self.collision_period_ms > min_dwell_ms {
            log::warn!(
                "Collision period {}ms too slow for the band, using {}ms",
                self.collision_period_ms,
                min_dwell_ms
            );
            self.collision_period_ms = min_dwell_ms;
        }
        if !(self.bounce_duration_ms > 0.0) {
            self.bounce_duration_ms = defaults.bounce_duration_ms;
        }
        self.max_lives = self.max_lives.max(1);
        self.start_lives = self.start_lives.clamp(1, self.max_lives);
        self.quiz_milestone = self.quiz_milestone.max(1);
        self
    }
}

/// Shortest time an item spends inside the open band, falling at full speed
///
/// An open band of height `band` holds at least `ceil(band / step) - 1`
/// consecutive fall positions.
fn band_dwell_ms(band: f32, step: f32) -> f64 {
    let positions = ((band / step).ceil() as f64 - 1.0).max(1.0);
    positions * MIN_FALL_INTERVAL_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "rare_food_points": 25, "max_lives": 5 }"#);
        assert_eq!(tuning.rare_food_points, 25);
        assert_eq!(tuning.max_lives, 5);
        assert_eq!(tuning.common_food_points, COMMON_FOOD_POINTS);
        assert_eq!(tuning.collision_dx, COLLISION_DX);
    }

    #[test]
    fn test_invalid_json_uses_defaults() {
        assert_eq!(Tuning::from_json("not json"), Tuning::default());
    }

    #[test]
    fn test_degenerate_values_repaired() {
        let tuning = Tuning::from_json(
            r#"{ "collision_period_ms": 0.0, "spawn_x_min": 95.0, "start_lives": 0, "max_lives": 0 }"#,
        );
        assert_eq!(tuning.collision_period_ms, COLLISION_PERIOD_MS);
        assert_eq!(tuning.spawn_x_min, SPAWN_X_MIN);
        assert_eq!(tuning.spawn_x_max, SPAWN_X_MAX);
        assert_eq!(tuning.max_lives, 1);
        assert_eq!(tuning.start_lives, 1);
    }

    #[test]
    fn test_defaults_untouched_by_sanitize() {
        assert_eq!(Tuning::default().sanitized(), Tuning::default());
    }

    #[test]
    fn test_fall_step_cannot_skip_band() {
        let tuning = Tuning::from_json(r#"{ "fall_step": 30.0 }"#);
        let band = tuning.collision_band_bottom - tuning.collision_band_top;
        assert!(tuning.fall_step < band);

        // Every position from spawn to off-screen; at least one lands in the band
        let mut y = tuning.spawn_y;
        let mut in_band = 0;
        while y < tuning.offscreen_y {
            if y > tuning.collision_band_top && y < tuning.collision_band_bottom {
                in_band += 1;
            }
            y += tuning.fall_step;
        }
        assert!(in_band >= 1);
        assert!(tuning.collision_period_ms <= MIN_FALL_INTERVAL_MS * in_band as f64);
    }

    #[test]
    fn test_field_layout_repaired() {
        let tuning = Tuning::from_json(r#"{ "spawn_y": 90.0 }"#);
        assert_eq!(tuning.spawn_y, SPAWN_Y);

        let tuning = Tuning::from_json(r#"{ "offscreen_y": 50.0 }"#);
        assert_eq!(tuning.offscreen_y, OFFSCREEN_Y);
        assert_eq!(tuning.collision_band_bottom, COLLISION_BAND_BOTTOM);
    }
}
