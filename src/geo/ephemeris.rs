//! Sunrise and sunset times from a short Fourier-series solar model.
//!
//! The formulas are the NOAA "General Solar Position Calculations" series:
//! a seven term declination, a five term equation of time, and the standard
//! hour angle for a zenith of 90.833°.
//!
//! ## Local time as the solar angle
//!
//! The fractional year is built from the *local* wall-clock fields of the
//! instant (day of year, hour, minute) without converting to UTC first. The
//! resulting sunrise and sunset are minute-of-day values relative to UTC
//! midnight; callers apply their own UTC offset. For sites many hours away
//! from UTC the fractional year is off by a fraction of a day, which moves
//! the result by well under a minute.
//!
//! ## Sign convention
//!
//! Longitude is **West-positive**. Geolocation providers report East-positive
//! longitude, so negate it before building a [`GeoCoordinate`].

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use std::f64::consts::PI;

use crate::constants::*;
use crate::error::SolarError;

/// A validated geographic position (latitude +N, longitude +W).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Validate and build a coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SolarError> {
        let in_range =
            (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(SolarError::InvalidRange {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from the East-positive longitude used by config files and geolocation services.
    pub fn from_east_positive(latitude: f64, longitude_east: f64) -> Result<Self, SolarError> {
        Self::new(latitude, -longitude_east)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// West-positive longitude.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Which solar event a time refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarEventKind {
    Sunrise,
    Sunset,
}

/// A sunrise or sunset as whole seconds after UTC midnight.
///
/// The value is not wrapped: far from Greenwich it can be negative or exceed
/// one day. Use [`SolarEvent::wall_clock`] for a displayable time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolarEvent {
    pub kind: SolarEventKind,
    pub seconds: i64,
}

impl SolarEvent {
    /// The event shifted by `utc_offset_hours` and wrapped into a single day.
    pub fn wall_clock(&self, utc_offset_hours: i32) -> NaiveTime {
        seconds_to_time(self.seconds + i64::from(utc_offset_hours) * 3600)
    }
}

/// Everything the controllers need from the ephemeris for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarTimes {
    pub sunrise: SolarEvent,
    pub sunset: SolarEvent,
    pub solar_noon: i64,
}

/// Wrap a (possibly negative) seconds-of-day value into a wall-clock time.
pub fn seconds_to_time(seconds: i64) -> NaiveTime {
    let wrapped = seconds.rem_euclid(86_400) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(wrapped, 0).unwrap_or(NaiveTime::MIN)
}

/// Fractional year γ in radians for the local wall-clock fields of `now`.
pub fn fractional_year(now: &NaiveDateTime) -> f64 {
    let day_of_year = f64::from(now.ordinal0());
    let hour = f64::from(now.hour());
    let minute = f64::from(now.minute());

    (2.0 * PI / DAYS_PER_YEAR) * (day_of_year + (hour - 12.0 + minute / 60.0) / 24.0)
}

/// Solar declination in radians.
pub fn declination(gamma: f64) -> f64 {
    0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin() - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002592 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin()
}

/// Equation of time in minutes.
pub fn equation_of_time(gamma: f64) -> f64 {
    EQUATION_OF_TIME_SCALE
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin())
}

/// Sunrise and sunset calculator for a single location.
#[derive(Debug, Clone)]
pub struct EphemerisCalculator {
    location: GeoCoordinate,
}

impl EphemerisCalculator {
    pub fn new(location: GeoCoordinate) -> Self {
        Self { location }
    }

    pub fn location(&self) -> GeoCoordinate {
        self.location
    }

    /// Move the calculator. The stored location is untouched on error.
    pub fn set_location(&mut self, latitude: f64, longitude: f64) -> Result<(), SolarError> {
        self.location = GeoCoordinate::new(latitude, longitude)?;
        Ok(())
    }

    /// Sunrise hour angle in degrees.
    pub fn sunrise_hour_angle(&self, gamma: f64) -> Result<f64, SolarError> {
        let latitude = self.location.latitude / DEGREES_PER_RADIAN;
        let decl = declination(gamma);
        let zenith = SUNRISE_ZENITH_DEGREES / DEGREES_PER_RADIAN;

        let cos_ha = zenith.cos() / (latitude.cos() * decl.cos()) - latitude.tan() * decl.tan();
        if !cos_ha.is_finite() || !(-1.0..=1.0).contains(&cos_ha) {
            return Err(SolarError::NoSunriseOrSunset);
        }
        Ok(cos_ha.acos() * DEGREES_PER_RADIAN)
    }

    /// Sunrise for the day of `now`, in seconds after UTC midnight.
    pub fn sunrise(&self, now: &NaiveDateTime) -> Result<i64, SolarError> {
        let gamma = fractional_year(now);
        let hour_angle = self.sunrise_hour_angle(gamma)?;
        Ok(self.event_seconds(gamma, hour_angle))
    }

    /// Sunset for the day of `now`, in seconds after UTC midnight.
    pub fn sunset(&self, now: &NaiveDateTime) -> Result<i64, SolarError> {
        let gamma = fractional_year(now);
        let hour_angle = self.sunrise_hour_angle(gamma)?;
        Ok(self.event_seconds(gamma, -hour_angle))
    }

    /// Solar noon for the day of `now`, in seconds after UTC midnight.
    pub fn solar_noon(&self, now: &NaiveDateTime) -> i64 {
        let eqtime = equation_of_time(fractional_year(now));
        ((SOLAR_NOON_BASE_MINUTES + 4.0 * self.location.longitude - eqtime) * 60.0) as i64
    }

    /// Sunrise, sunset and solar noon in one pass.
    pub fn times(&self, now: &NaiveDateTime) -> Result<SolarTimes, SolarError> {
        let gamma = fractional_year(now);
        let hour_angle = self.sunrise_hour_angle(gamma)?;

        Ok(SolarTimes {
            sunrise: SolarEvent {
                kind: SolarEventKind::Sunrise,
                seconds: self.event_seconds(gamma, hour_angle),
            },
            sunset: SolarEvent {
                kind: SolarEventKind::Sunset,
                seconds: self.event_seconds(gamma, -hour_angle),
            },
            solar_noon: self.solar_noon(now),
        })
    }

    // Minutes are truncated to a whole minute before scaling to seconds
    fn event_seconds(&self, gamma: f64, hour_angle: f64) -> i64 {
        let eqtime = equation_of_time(gamma);
        let minutes = EVENT_BASE_MINUTES + 4.0 * (self.location.longitude - hour_angle) - eqtime;
        (minutes as i64) * 60
    }
}

impl Default for EphemerisCalculator {
    fn default() -> Self {
        Self {
            location: GeoCoordinate {
                latitude: DEFAULT_LATITUDE,
                longitude: -DEFAULT_LONGITUDE,
            },
        }
    }
}
