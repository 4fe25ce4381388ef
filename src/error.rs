//! Error type for the solar and colour calculations.
//!
//! These are local, pure-computation failures. They are returned as values so
//! that a NaN never reaches the exposure controller or a display.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolarError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180]
    InvalidRange { latitude: f64, longitude: f64 },
    /// The sunrise hour angle has no real solution (polar day or polar night)
    NoSunriseOrSunset,
    /// Colour temperature too low for the logarithmic channel formulas
    InvalidTemperature(i32),
}

impl fmt::Display for SolarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolarError::InvalidRange {
                latitude,
                longitude,
            } => write!(
                f,
                "Coordinates out of range: latitude {latitude} (expected -90..=90), longitude {longitude} (expected -180..=180)"
            ),
            SolarError::NoSunriseOrSunset => {
                write!(f, "The sun does not rise or set on this day at this latitude")
            }
            SolarError::InvalidTemperature(temperature) => write!(
                f,
                "Colour temperature {temperature} is too low (must be greater than 10)"
            ),
        }
    }
}

impl std::error::Error for SolarError {}
