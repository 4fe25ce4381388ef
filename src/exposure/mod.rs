//! Exposure mode selection and brightness feedback for the camera.
//!
//! The controller is a small state machine over [`ExposureMode`]. Each cycle it
//! adapts shutter duration to the brightness of the previous frame, tracks how
//! long the night sky has stayed clear, and switches between day and night
//! parameter sets around sunrise and sunset.
//!
//! ## Key Functionality
//! - **Mode Transitions**: Day/Night switching with a midnight-sun guard
//! - **Brightness Feedback**: Shutter driven down on glare, up on dim frames
//! - **High Gain**: Extra gain in the last hour before sunset
//! - **Clear-Sky Streak**: One notification per uninterrupted clear run

pub mod bounded;
pub mod controller;
pub mod sample;
pub mod settings;

pub use bounded::Bounded;
pub use controller::{
    CaptureParameters, CycleInput, CycleReport, DaylightWindow, ExposureModeController,
    ExposureState, ModeChange, ShutterAdjustment,
};
pub use sample::{BrightnessSample, SkyLabel, sky_is_clear};
pub use settings::{ExposureLimits, ExposureSettings};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DAY_SATURATION, NIGHT_SATURATION};

/// Operating mode of the camera.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureMode {
    /// Before the first evaluation; no parameters chosen yet
    Unknown,

    /// Short exposures, minimum gain, colour saturation boost
    Day,

    /// Long exposures at high gain, no saturation boost
    Night,

    /// Day parameters with raised gain for the final hour before sunset
    DayHighGain,
}

impl fmt::Display for ExposureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl ExposureMode {
    /// Returns true for the modes that follow the day brightness rules.
    pub fn is_day_like(&self) -> bool {
        matches!(self, Self::Day | Self::DayHighGain)
    }

    pub fn is_night(&self) -> bool {
        matches!(self, Self::Night)
    }

    /// Returns the display name for this mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Day => "Day",
            Self::Night => "Night",
            Self::DayHighGain => "Day (high gain)",
        }
    }

    /// Colour saturation passed to the capture driver.
    pub fn saturation(&self) -> i32 {
        if self.is_day_like() {
            DAY_SATURATION
        } else {
            NIGHT_SATURATION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_like_modes() {
        assert!(ExposureMode::Day.is_day_like());
        assert!(ExposureMode::DayHighGain.is_day_like());
        assert!(!ExposureMode::Night.is_day_like());
        assert!(!ExposureMode::Unknown.is_day_like());
    }

    #[test]
    fn test_saturation_per_mode() {
        assert_eq!(ExposureMode::Day.saturation(), 20);
        assert_eq!(ExposureMode::DayHighGain.saturation(), 20);
        assert_eq!(ExposureMode::Night.saturation(), 0);
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&ExposureMode::DayHighGain).unwrap();
        assert_eq!(json, "\"day_high_gain\"");
        assert_eq!(ExposureMode::DayHighGain.to_string(), "Day (high gain)");
    }
}
