//! Tunable bounds, defaults and thresholds for the exposure controller.
//!
//! Deserialized from the optional `[exposure]` table of the config file. Any
//! field left out keeps its built-in default.

use serde::{Deserialize, Serialize};

use super::{Bounded, ExposureMode};
use crate::constants::*;

/// Shutter (microseconds) and gain (ISO) ranges for one mode family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureLimits {
    pub shutter_min: i64,
    pub shutter_max: i64,
    pub gain_min: i64,
    pub gain_max: i64,
}

impl Default for ExposureLimits {
    fn default() -> Self {
        Self {
            shutter_min: DEFAULT_SHUTTER_MIN,
            shutter_max: DEFAULT_SHUTTER_MAX,
            gain_min: DEFAULT_GAIN_MIN,
            gain_max: DEFAULT_GAIN_MAX,
        }
    }
}

impl ExposureLimits {
    pub fn shutter(&self, value: i64) -> Bounded {
        Bounded::new(value, self.shutter_min, self.shutter_max)
    }

    pub fn gain(&self, value: i64) -> Bounded {
        Bounded::new(value, self.gain_min, self.gain_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureSettings {
    /// Limits for Day and DayHighGain (and the initial seed)
    pub day_limits: ExposureLimits,
    pub night_limits: ExposureLimits,

    pub shutter_seed: i64,
    pub gain_seed: i64,
    /// Shutter on the very first switch into Day
    pub shutter_day_first: i64,
    pub shutter_day: i64,
    pub shutter_night: i64,
    pub gain_high: i64,
    pub gain_night: i64,

    pub day_bright_threshold: f64,
    pub day_sun_area_threshold: f64,
    pub day_dim_threshold: f64,
    pub day_dim_sun_area_threshold: f64,
    pub shutter_increase_factor: f64,

    pub night_bright_threshold: f64,
    pub night_dark_threshold: f64,
    pub shutter_decrease_factor: f64,

    pub clear_sky_streak: u32,
    pub cloud_fraction_threshold: f64,
}

impl Default for ExposureSettings {
    fn default() -> Self {
        Self {
            day_limits: ExposureLimits::default(),
            night_limits: ExposureLimits::default(),
            shutter_seed: DEFAULT_SHUTTER_SEED,
            gain_seed: DEFAULT_GAIN_SEED,
            shutter_day_first: DEFAULT_SHUTTER_DAY_FIRST,
            shutter_day: DEFAULT_SHUTTER_DAY,
            shutter_night: DEFAULT_SHUTTER_NIGHT,
            gain_high: DEFAULT_GAIN_HIGH,
            gain_night: DEFAULT_GAIN_NIGHT,
            day_bright_threshold: DEFAULT_DAY_BRIGHT_THRESHOLD,
            day_sun_area_threshold: DEFAULT_DAY_SUN_AREA_THRESHOLD,
            day_dim_threshold: DEFAULT_DAY_DIM_THRESHOLD,
            day_dim_sun_area_threshold: DEFAULT_DAY_DIM_SUN_AREA_THRESHOLD,
            shutter_increase_factor: DEFAULT_SHUTTER_INCREASE_FACTOR,
            night_bright_threshold: DEFAULT_NIGHT_BRIGHT_THRESHOLD,
            night_dark_threshold: DEFAULT_NIGHT_DARK_THRESHOLD,
            shutter_decrease_factor: DEFAULT_SHUTTER_DECREASE_FACTOR,
            clear_sky_streak: DEFAULT_CLEAR_SKY_STREAK,
            cloud_fraction_threshold: DEFAULT_CLOUD_FRACTION_THRESHOLD,
        }
    }
}

impl ExposureSettings {
    /// Limits that apply while in `mode`. Unknown uses the day limits.
    pub fn limits_for(&self, mode: ExposureMode) -> &ExposureLimits {
        match mode {
            ExposureMode::Night => &self.night_limits,
            ExposureMode::Unknown | ExposureMode::Day | ExposureMode::DayHighGain => {
                &self.day_limits
            }
        }
    }
}
