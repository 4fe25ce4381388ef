//! Day/night mode switching and per-cycle exposure adaptation.
//!
//! The controller owns no mutable state. Callers pass an [`ExposureState`] in
//! and get the updated state back together with a [`CycleReport`] describing
//! what changed, so two cameras can share one controller and identical inputs
//! always give identical results.
//!
//! One evaluation runs three steps in order:
//! 1. adapt the shutter to the previous frame's brightness, using the rules of
//!    the mode that frame was captured in
//! 2. update the clear-sky streak (night only)
//! 3. switch modes based on the time of day relative to sunrise and sunset

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use super::{
    Bounded, BrightnessSample, ExposureMode, ExposureSettings, SkyLabel, sky_is_clear,
};
use crate::constants::{HIGH_GAIN_WINDOW_SECS, LATEST_NIGHT_SUNSET_HOUR};
use crate::error::SolarError;
use crate::geo::SolarTimes;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Mode and capture parameters carried from one cycle to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExposureState {
    pub mode: ExposureMode,
    /// Microseconds
    pub shutter: Bounded,
    /// ISO
    pub gain: Bounded,
    /// Consecutive clear night frames
    pub clear_sky_streak: u32,
}

impl ExposureState {
    pub fn capture_parameters(&self) -> CaptureParameters {
        CaptureParameters {
            mode: self.mode,
            shutter: self.shutter.value(),
            gain: self.gain.value(),
            saturation: self.mode.saturation(),
        }
    }
}

/// What the capture driver needs for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureParameters {
    pub mode: ExposureMode,
    pub shutter: i64,
    pub gain: i64,
    pub saturation: i32,
}

/// Everything one evaluation looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleInput {
    /// Local wall-clock time
    pub time_of_day: NaiveTime,
    /// Today's solar events in UTC seconds, or why there are none
    pub solar_times: Result<SolarTimes, SolarError>,
    pub utc_offset_hours: i32,
    /// Brightness of the previous frame; absent on the first cycle
    pub sample: Option<BrightnessSample>,
    /// Classifier verdict for that frame; absent without a classifier
    pub sky_label: Option<SkyLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeChange {
    pub from: ExposureMode,
    pub to: ExposureMode,
}

/// Shutter change made from brightness feedback. Values are the new shutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutterAdjustment {
    /// Glare or a large sun area: shortest exposure and a long pause
    DrivenToMinimum(i64),
    Lengthened(i64),
    Shortened(i64),
    ResetToNightDefault(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleReport {
    pub transition: Option<ModeChange>,
    /// Shutter and gain were replaced by the new mode's defaults
    pub parameters_reset: bool,
    pub adjustment: Option<ShutterAdjustment>,
    /// The next day capture should wait longer than usual
    pub long_wait: bool,
    pub notify_clear_sky: bool,
    /// Set when the mode was held because there is no sunrise or sunset today
    pub ephemeris_error: Option<SolarError>,
}

/// Sunrise and sunset moved to local wall-clock seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightWindow {
    /// Seconds since local midnight
    pub sunrise: i64,
    /// Seconds since local midnight
    pub sunset: i64,
    /// Local sunset hour before wrapping to the clock; 24 or more means after midnight
    pub sunset_hour: i64,
}

impl DaylightWindow {
    pub fn new(times: &SolarTimes, utc_offset_hours: i32) -> Self {
        let offset = i64::from(utc_offset_hours) * SECONDS_PER_HOUR;
        let sunrise = times.sunrise.seconds + offset;
        let sunset = times.sunset.seconds + offset;

        Self {
            sunrise: sunrise.rem_euclid(SECONDS_PER_DAY),
            sunset: sunset.rem_euclid(SECONDS_PER_DAY),
            sunset_hour: sunset.div_euclid(SECONDS_PER_HOUR),
        }
    }

    pub fn is_night(&self, now: i64) -> bool {
        now > self.sunset || now < self.sunrise
    }

    pub fn is_day(&self, now: i64) -> bool {
        now > self.sunrise && now < self.sunset
    }

    /// Midnight sun: the sun sets too late for a useful night.
    pub fn sunset_after_midnight(&self) -> bool {
        self.sunset_hour > LATEST_NIGHT_SUNSET_HOUR
    }

    /// Within the hour before the next sunset on the clock. The hour may
    /// straddle midnight when sunset falls just after it.
    pub fn in_final_daylight_hour(&self, now: i64) -> bool {
        let until_sunset = (self.sunset - now).rem_euclid(SECONDS_PER_DAY);
        until_sunset > 0 && until_sunset < HIGH_GAIN_WINDOW_SECS
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExposureModeController {
    settings: ExposureSettings,
}

impl ExposureModeController {
    pub fn new(settings: ExposureSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExposureSettings {
        &self.settings
    }

    /// State before the first evaluation: mode Unknown with the seed parameters.
    pub fn initial_state(&self) -> ExposureState {
        let limits = self.settings.limits_for(ExposureMode::Unknown);
        ExposureState {
            mode: ExposureMode::Unknown,
            shutter: limits.shutter(self.settings.shutter_seed),
            gain: limits.gain(self.settings.gain_seed),
            clear_sky_streak: 0,
        }
    }

    /// Run one full cycle: adapt, track the sky, then switch modes.
    pub fn evaluate(
        &self,
        mut state: ExposureState,
        input: &CycleInput,
    ) -> (ExposureState, CycleReport) {
        let mut report = CycleReport::default();

        if let Some(sample) = &input.sample {
            let (adjustment, long_wait) = self.adapt_exposure(&mut state, sample);
            report.adjustment = adjustment;
            report.long_wait = long_wait;
            report.notify_clear_sky = self.record_sky(&mut state, input.sky_label, sample);
        }

        match &input.solar_times {
            Ok(times) => {
                let window = DaylightWindow::new(times, input.utc_offset_hours);
                if let Some(change) = self.transition(&mut state, input.time_of_day, &window) {
                    report.parameters_reset = change.to != ExposureMode::DayHighGain;
                    report.transition = Some(change);
                }
            }
            Err(e) => {
                log_warning!("{e}; staying in {} mode", state.mode);
                report.ephemeris_error = Some(*e);
            }
        }

        (state, report)
    }

    /// Adjust the shutter for the brightness of a frame captured in `state.mode`.
    ///
    /// Returns the adjustment made, if any, and whether the next day capture
    /// should be delayed.
    pub fn adapt_exposure(
        &self,
        state: &mut ExposureState,
        sample: &BrightnessSample,
    ) -> (Option<ShutterAdjustment>, bool) {
        let s = &self.settings;
        let brightness = sample.average_brightness;
        let sun_area = sample.bright_fraction;

        match state.mode {
            ExposureMode::Day | ExposureMode::DayHighGain => {
                if brightness > s.day_bright_threshold || sun_area > s.day_sun_area_threshold {
                    let shutter = state.shutter.to_min();
                    log_decorated!(
                        "Frame too bright (brightness {brightness:.1}, sun area {sun_area:.4}), shutter to {shutter} µs"
                    );
                    (Some(ShutterAdjustment::DrivenToMinimum(shutter)), true)
                } else if brightness < s.day_dim_threshold
                    && sun_area < s.day_dim_sun_area_threshold
                {
                    let shutter = state.shutter.scale(s.shutter_increase_factor);
                    log_decorated!("Frame dim (brightness {brightness:.1}), shutter up to {shutter} µs");
                    (Some(ShutterAdjustment::Lengthened(shutter)), false)
                } else {
                    (None, false)
                }
            }
            ExposureMode::Night => {
                if brightness > s.night_bright_threshold {
                    let shutter = state.shutter.scale(1.0 / s.shutter_decrease_factor);
                    log_decorated!(
                        "Night frame too bright (brightness {brightness:.1}), shutter down to {shutter} µs"
                    );
                    (Some(ShutterAdjustment::Shortened(shutter)), false)
                } else if brightness <= s.night_dark_threshold {
                    let shutter = state.shutter.set(s.shutter_night);
                    log_decorated!("Night frame dark (brightness {brightness:.1}), shutter reset to {shutter} µs");
                    (Some(ShutterAdjustment::ResetToNightDefault(shutter)), false)
                } else {
                    (None, false)
                }
            }
            ExposureMode::Unknown => (None, false),
        }
    }

    /// Count clear night frames. Returns true exactly when the streak reaches
    /// the configured length.
    pub fn record_sky(
        &self,
        state: &mut ExposureState,
        label: Option<SkyLabel>,
        sample: &BrightnessSample,
    ) -> bool {
        if !state.mode.is_night() {
            return false;
        }

        if sky_is_clear(label, sample, self.settings.cloud_fraction_threshold) {
            state.clear_sky_streak = state.clear_sky_streak.saturating_add(1);
            if state.clear_sky_streak == self.settings.clear_sky_streak {
                log_block_start!(
                    "Sky clear for {} consecutive frames",
                    state.clear_sky_streak
                );
                return true;
            }
        } else {
            if state.clear_sky_streak > 0 {
                log_decorated!(
                    "Cloud detected after {} clear frames, streak reset",
                    state.clear_sky_streak
                );
            }
            state.clear_sky_streak = 0;
        }

        false
    }

    /// Apply the first matching mode rule for `now` (local time of day).
    pub fn transition(
        &self,
        state: &mut ExposureState,
        now: NaiveTime,
        window: &DaylightWindow,
    ) -> Option<ModeChange> {
        let now = i64::from(now.num_seconds_from_midnight());
        let from = state.mode;

        let may_enter_night = matches!(
            from,
            ExposureMode::Unknown | ExposureMode::Day | ExposureMode::DayHighGain
        );
        if may_enter_night && window.is_night(now) && !window.sunset_after_midnight() {
            self.enter_night(state);
            return Some(self.announce(from, state));
        }

        let may_enter_day = matches!(from, ExposureMode::Unknown | ExposureMode::Night);
        if may_enter_day && (window.is_day(now) || window.sunset_after_midnight()) {
            self.enter_day(state, from == ExposureMode::Unknown);
            return Some(self.announce(from, state));
        }

        if from == ExposureMode::Day
            && state.gain.is_at_min()
            && window.in_final_daylight_hour(now)
        {
            state.mode = ExposureMode::DayHighGain;
            state.gain.set(self.settings.gain_high);
            return Some(self.announce(from, state));
        }

        None
    }

    fn enter_night(&self, state: &mut ExposureState) {
        let limits = self.settings.limits_for(ExposureMode::Night);
        state.mode = ExposureMode::Night;
        state.shutter = limits.shutter(self.settings.shutter_night);
        state.gain = limits.gain(self.settings.gain_night);
        state.clear_sky_streak = 0;
    }

    fn enter_day(&self, state: &mut ExposureState, first: bool) {
        let limits = self.settings.limits_for(ExposureMode::Day);
        let shutter = if first {
            self.settings.shutter_day_first
        } else {
            self.settings.shutter_day
        };
        state.mode = ExposureMode::Day;
        state.shutter = limits.shutter(shutter);
        state.gain = limits.gain(limits.gain_min);
        state.clear_sky_streak = 0;
    }

    fn announce(&self, from: ExposureMode, state: &ExposureState) -> ModeChange {
        log_block_start!("Switching from {} to {} mode", from, state.mode);
        log_indented!(
            "Shutter: {} µs, gain: ISO {}, saturation: {}",
            state.shutter.value(),
            state.gain.value(),
            state.mode.saturation()
        );
        ModeChange {
            from,
            to: state.mode,
        }
    }
}
