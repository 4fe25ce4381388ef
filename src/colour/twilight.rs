//! Display colour and luminosity for a point in time.
//!
//! Neutral white during the day and a compressed colour-temperature ramp in
//! the hour after sunrise and the hour before sunset. Outside daylight the
//! curve asks for the bottom of the scale, which the mapper cannot render, so
//! those instants (and the first minutes of each ramp) report
//! [`SolarError::InvalidTemperature`]. The luminosity curve is defined for the
//! whole day: a 0.033 floor at night with a short ramp right at the events.
//!
//! The clock is read one hour behind local wall time before it is compared
//! with the (UTC-based) sunrise and sunset. The controller holds no state and
//! can be called at any cadence.

use chrono::{NaiveDateTime, Timelike};

use super::temperature::{ColourSample, temperature_to_colour};
use crate::constants::*;
use crate::error::SolarError;
use crate::geo::EphemerisCalculator;

#[derive(Debug, Clone)]
pub struct TwilightColourController {
    ephemeris: EphemerisCalculator,
}

impl TwilightColourController {
    pub fn new(ephemeris: EphemerisCalculator) -> Self {
        Self { ephemeris }
    }

    pub fn ephemeris(&self) -> &EphemerisCalculator {
        &self.ephemeris
    }

    /// Colour and applied luminosity for `now` (local wall-clock time).
    pub fn colour_for_instant(&self, now: &NaiveDateTime) -> Result<ColourSample, SolarError> {
        let sunrise = self.ephemeris.sunrise(now)?;
        let sunset = self.ephemeris.sunset(now)?;
        let time_of_day = i64::from(now.num_seconds_from_midnight()) - TWILIGHT_CLOCK_OFFSET_SECS;

        colour_for_time_of_day(time_of_day, sunrise, sunset)
    }
}

/// The twilight colour for a time of day relative to sunrise and sunset.
pub fn colour_for_time_of_day(
    time_of_day: i64,
    sunrise: i64,
    sunset: i64,
) -> Result<ColourSample, SolarError> {
    let temperature = twilight_temperature(time_of_day, sunrise, sunset);
    let luminosity = twilight_luminosity(time_of_day, sunrise, sunset);
    Ok(temperature_to_colour(temperature)?.with_luminosity(luminosity))
}

/// Compressed colour temperature the curve asks for.
///
/// Later rules override earlier ones: sunrise ramp, sunset ramp, before
/// sunrise, after sunset.
pub fn twilight_temperature(time_of_day: i64, sunrise: i64, sunset: i64) -> i32 {
    let mut temperature = NEUTRAL_TEMPERATURE;

    let since_sunrise = time_of_day - sunrise;
    if since_sunrise > 0 && since_sunrise < TWILIGHT_WINDOW_SECS {
        temperature = ramp_temperature(since_sunrise);
    }

    let until_sunset = sunset - time_of_day;
    if until_sunset > 0 && until_sunset < TWILIGHT_WINDOW_SECS {
        temperature = ramp_temperature(until_sunset);
    }

    if time_of_day <= sunrise || time_of_day >= sunset {
        temperature = TWILIGHT_BASE_TEMPERATURE;
    }

    temperature
}

/// Luminosity multiplier for a time of day, in [0.033, 1].
pub fn twilight_luminosity(time_of_day: i64, sunrise: i64, sunset: i64) -> f64 {
    let mut luminosity = 1.0;

    if time_of_day <= sunrise {
        let remaining = sunrise - time_of_day;
        luminosity = if remaining < LUMINOSITY_RAMP_SECS {
            ramp_luminosity(LUMINOSITY_RAMP_SECS - remaining)
        } else {
            NIGHT_LUMINOSITY
        };
    }

    if time_of_day >= sunset {
        let elapsed = time_of_day - sunset;
        luminosity = if elapsed < LUMINOSITY_RAMP_SECS {
            ramp_luminosity(LUMINOSITY_RAMP_SECS - elapsed)
        } else {
            NIGHT_LUMINOSITY
        };
    }

    luminosity
}

// 5 + whole minutes into the window
fn ramp_temperature(seconds_into_window: i64) -> i32 {
    TWILIGHT_BASE_TEMPERATURE + (seconds_into_window / 60) as i32
}

// Linear from NIGHT_LUMINOSITY (0 s) to 1.0 (LUMINOSITY_RAMP_SECS)
fn ramp_luminosity(seconds_towards_event: i64) -> f64 {
    let progress = seconds_towards_event as f64 / LUMINOSITY_RAMP_SECS as f64;
    NIGHT_LUMINOSITY + (1.0 - NIGHT_LUMINOSITY) * progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoCoordinate;
    use chrono::NaiveDate;

    const SUNRISE: i64 = 5 * 3600;
    const SUNSET: i64 = 18 * 3600;

    fn neutral() -> ColourSample {
        temperature_to_colour(NEUTRAL_TEMPERATURE).unwrap()
    }

    fn equinox(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_midday_is_neutral_at_full_luminosity() {
        let colour = colour_for_time_of_day(12 * 3600, SUNRISE, SUNSET).unwrap();
        assert_eq!(colour.rgb, neutral().rgb);
        assert_eq!(colour.luminosity, 1.0);
    }

    #[test]
    fn test_sunrise_ramp_uses_whole_minutes() {
        // 10 minutes and 59 seconds after sunrise -> 5 + 10
        let colour = colour_for_time_of_day(SUNRISE + 659, SUNRISE, SUNSET).unwrap();
        assert_eq!(colour.rgb, temperature_to_colour(15).unwrap().rgb);
        assert_eq!(colour.luminosity, 1.0);

        // Last second of the window
        let colour = colour_for_time_of_day(SUNRISE + 3599, SUNRISE, SUNSET).unwrap();
        assert_eq!(colour.rgb, temperature_to_colour(64).unwrap().rgb);

        // Window is exclusive at one hour
        let colour = colour_for_time_of_day(SUNRISE + 3600, SUNRISE, SUNSET).unwrap();
        assert_eq!(colour.rgb, neutral().rgb);
    }

    #[test]
    fn test_sunset_ramp_counts_down() {
        let colour = colour_for_time_of_day(SUNSET - 30 * 60, SUNRISE, SUNSET).unwrap();
        assert_eq!(colour.rgb, temperature_to_colour(35).unwrap().rgb);
        assert_eq!(colour.luminosity, 1.0);
    }

    #[test]
    fn test_early_ramp_reports_invalid_temperature() {
        // Two minutes after sunrise asks for 7
        assert_eq!(
            colour_for_time_of_day(SUNRISE + 120, SUNRISE, SUNSET),
            Err(SolarError::InvalidTemperature(7))
        );
        // Five minutes in is still 10, six minutes is the first renderable value
        assert_eq!(
            colour_for_time_of_day(SUNRISE + 5 * 60, SUNRISE, SUNSET),
            Err(SolarError::InvalidTemperature(10))
        );
        let colour = colour_for_time_of_day(SUNRISE + 6 * 60, SUNRISE, SUNSET).unwrap();
        assert_eq!(colour.rgb, temperature_to_colour(11).unwrap().rgb);

        // Last minutes before sunset mirror it
        assert_eq!(
            colour_for_time_of_day(SUNSET - 90, SUNRISE, SUNSET),
            Err(SolarError::InvalidTemperature(6))
        );
    }

    #[test]
    fn test_night_reports_invalid_temperature() {
        for time_of_day in [1, 2 * 3600, SUNRISE, SUNSET, 23 * 3600] {
            assert_eq!(
                twilight_temperature(time_of_day, SUNRISE, SUNSET),
                TWILIGHT_BASE_TEMPERATURE
            );
            assert_eq!(
                colour_for_time_of_day(time_of_day, SUNRISE, SUNSET),
                Err(SolarError::InvalidTemperature(TWILIGHT_BASE_TEMPERATURE))
            );
        }
    }

    #[test]
    fn test_night_luminosity_floor() {
        assert_eq!(twilight_luminosity(2 * 3600, SUNRISE, SUNSET), NIGHT_LUMINOSITY);
        assert_eq!(twilight_luminosity(23 * 3600, SUNRISE, SUNSET), NIGHT_LUMINOSITY);
        assert_eq!(twilight_luminosity(12 * 3600, SUNRISE, SUNSET), 1.0);
    }

    #[test]
    fn test_luminosity_ramps_up_to_sunrise() {
        let at_30 = twilight_luminosity(SUNRISE - 30, SUNRISE, SUNSET);
        let at_15 = twilight_luminosity(SUNRISE - 15, SUNRISE, SUNSET);
        let at_0 = twilight_luminosity(SUNRISE, SUNRISE, SUNSET);

        assert_eq!(at_30, NIGHT_LUMINOSITY);
        assert!((at_15 - (NIGHT_LUMINOSITY + 1.0) / 2.0).abs() < 1e-9);
        assert!((at_0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_luminosity_ramps_down_after_sunset() {
        let at_0 = twilight_luminosity(SUNSET, SUNRISE, SUNSET);
        let at_10 = twilight_luminosity(SUNSET + 10, SUNRISE, SUNSET);
        let at_30 = twilight_luminosity(SUNSET + 30, SUNRISE, SUNSET);

        assert!((at_0 - 1.0).abs() < 1e-9);
        assert!(at_10 < at_0);
        assert!(at_10 > NIGHT_LUMINOSITY);
        assert_eq!(at_30, NIGHT_LUMINOSITY);
    }

    #[test]
    fn test_controller_applies_clock_offset() {
        let calc = EphemerisCalculator::new(GeoCoordinate::new(0.0, 0.0).unwrap());
        let controller = TwilightColourController::new(calc.clone());
        let now = equinox(13);

        let expected = colour_for_time_of_day(
            12 * 3600,
            calc.sunrise(&now).unwrap(),
            calc.sunset(&now).unwrap(),
        );
        assert_eq!(controller.colour_for_instant(&now), expected);
        assert_eq!(expected.unwrap().rgb, neutral().rgb);
    }

    #[test]
    fn test_controller_surfaces_night_as_invalid_temperature() {
        let calc = EphemerisCalculator::new(GeoCoordinate::new(0.0, 0.0).unwrap());
        let controller = TwilightColourController::new(calc);

        assert_eq!(
            controller.colour_for_instant(&equinox(2)),
            Err(SolarError::InvalidTemperature(TWILIGHT_BASE_TEMPERATURE))
        );
    }

    #[test]
    fn test_controller_propagates_polar_errors() {
        let calc = EphemerisCalculator::new(GeoCoordinate::new(85.0, 0.0).unwrap());
        let controller = TwilightColourController::new(calc);
        let now = NaiveDate::from_ymd_opt(2024, 6, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        assert_eq!(
            controller.colour_for_instant(&now),
            Err(SolarError::NoSunriseOrSunset)
        );
    }
}
