//! Display and formatting of solar calculations.
//!
//! Builds a [`SolarReport`] for a location and instant and renders it either
//! as a log block or as JSON. The report includes the sunrise and sunset of
//! the `sunrise` crate as an independent reference, which makes drift in the
//! short Fourier-series model easy to spot.

use anyhow::Result;
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::ephemeris::{
    EphemerisCalculator, SolarTimes, declination, equation_of_time, fractional_year,
    seconds_to_time,
};

/// Everything the `sun` command prints.
#[derive(Debug, Clone, Serialize)]
pub struct SolarReport {
    pub latitude: f64,
    /// East-positive, as configured
    pub longitude: f64,
    pub at: NaiveDateTime,
    pub utc_offset: i32,
    pub declination_degrees: f64,
    pub equation_of_time_minutes: f64,
    /// `None` when the sun does not rise or set on this day
    pub times: Option<SolarTimes>,
    pub sunrise_utc: Option<NaiveTime>,
    pub sunset_utc: Option<NaiveTime>,
    pub solar_noon_utc: NaiveTime,
    pub sunrise_local: Option<NaiveTime>,
    pub sunset_local: Option<NaiveTime>,
    pub reference_sunrise_utc: Option<String>,
    pub reference_sunset_utc: Option<String>,
}

impl SolarReport {
    pub fn new(calc: &EphemerisCalculator, at: NaiveDateTime, utc_offset: i32) -> Self {
        let gamma = fractional_year(&at);
        let times = calc.times(&at).ok();
        let location = calc.location();
        let (reference_sunrise_utc, reference_sunset_utc) =
            reference_times(location.latitude(), -location.longitude(), at);

        Self {
            latitude: location.latitude(),
            longitude: -location.longitude(),
            at,
            utc_offset,
            declination_degrees: declination(gamma).to_degrees(),
            equation_of_time_minutes: equation_of_time(gamma),
            times,
            sunrise_utc: times.map(|t| t.sunrise.wall_clock(0)),
            sunset_utc: times.map(|t| t.sunset.wall_clock(0)),
            solar_noon_utc: seconds_to_time(calc.solar_noon(&at)),
            sunrise_local: times.map(|t| t.sunrise.wall_clock(utc_offset)),
            sunset_local: times.map(|t| t.sunset.wall_clock(utc_offset)),
            reference_sunrise_utc,
            reference_sunset_utc,
        }
    }

    /// Render the report as a log block.
    pub fn log(&self) {
        log_block_start!(
            "Solar times for {:.4}°, {:.4}° on {}",
            self.latitude,
            self.longitude,
            self.at.format("%Y-%m-%d %H:%M")
        );

        match (self.sunrise_utc, self.sunset_utc) {
            (Some(sunrise), Some(sunset)) => {
                log_indented!("       Sunrise UTC: {}", sunrise.format("%H:%M"));
                log_indented!("        Sunset UTC: {}", sunset.format("%H:%M"));
            }
            _ => {
                log_pipe!();
                log_warning!("The sun does not rise or set on this day at this latitude");
            }
        }
        log_indented!(
            "    Solar noon UTC: {}",
            self.solar_noon_utc.format("%H:%M:%S")
        );

        if let (Some(sunrise), Some(sunset)) = (self.sunrise_local, self.sunset_local) {
            log_decorated!("Local time (UTC{:+}):", self.utc_offset);
            log_indented!("           Sunrise: {}", sunrise.format("%H:%M"));
            log_indented!("            Sunset: {}", sunset.format("%H:%M"));
        }

        log_decorated!("Solar position:");
        log_indented!("       Declination: {:.3}°", self.declination_degrees);
        log_indented!(
            "  Equation of time: {:.2} min",
            self.equation_of_time_minutes
        );

        if let (Some(sunrise), Some(sunset)) =
            (&self.reference_sunrise_utc, &self.reference_sunset_utc)
        {
            log_decorated!("Reference (sunrise crate):");
            log_indented!("       Sunrise UTC: {sunrise}");
            log_indented!("        Sunset UTC: {sunset}");
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sunrise and sunset from the `sunrise` crate, which takes East-positive longitude.
fn reference_times(
    latitude: f64,
    longitude_east: f64,
    at: NaiveDateTime,
) -> (Option<String>, Option<String>) {
    use sunrise::{Coordinates, SolarDay, SolarEvent};

    let Some(coord) = Coordinates::new(latitude, longitude_east) else {
        return (None, None);
    };
    let solar_day = SolarDay::new(coord, at.date());
    let sunrise = solar_day.event_time(SolarEvent::Sunrise);
    let sunset = solar_day.event_time(SolarEvent::Sunset);

    (
        Some(sunrise.format("%H:%M").to_string()),
        Some(sunset.format("%H:%M").to_string()),
    )
}
