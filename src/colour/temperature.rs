//! Black-body colour approximation.
//!
//! A piecewise fit of the Planckian locus. The input is on a compressed,
//! non-physical scale where 66 is neutral white and values towards 10 turn
//! deep blue; it is not Kelvin.

use serde::Serialize;

use crate::constants::MINIMUM_TEMPERATURE_EXCLUSIVE;
use crate::error::SolarError;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// A colour plus the uniform luminosity it should be shown at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColourSample {
    pub rgb: Rgb,
    /// In [0, 1]
    pub luminosity: f64,
}

impl ColourSample {
    /// Each channel multiplied by the luminosity and clamped to the display range.
    pub fn scaled(&self) -> Rgb {
        let scale = |channel: u8| to_channel(f64::from(channel) * self.luminosity);
        Rgb {
            red: scale(self.rgb.red),
            green: scale(self.rgb.green),
            blue: scale(self.rgb.blue),
        }
    }

    pub(crate) fn with_luminosity(self, luminosity: f64) -> Self {
        Self {
            rgb: self.rgb,
            luminosity: luminosity.clamp(0.0, 1.0),
        }
    }
}

fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

/// Map a compressed colour temperature to RGB at full luminosity.
pub fn temperature_to_colour(temperature: i32) -> Result<ColourSample, SolarError> {
    if temperature <= MINIMUM_TEMPERATURE_EXCLUSIVE {
        return Err(SolarError::InvalidTemperature(temperature));
    }
    let t = f64::from(temperature);

    let red = if temperature <= 66 {
        255.0
    } else {
        329.698727446 * (t - 60.0).powf(-0.1332047592)
    };

    let green = if temperature <= 66 {
        99.4708025861 * t.ln() - 161.1195681661
    } else {
        288.1221695283 * (t - 60.0).powf(-0.0755148492)
    };

    let blue = if temperature >= 66 {
        255.0
    } else {
        138.5177312231 * (t - 10.0).ln() - 305.0447927307
    };

    Ok(ColourSample {
        rgb: Rgb {
            red: to_channel(red),
            green: to_channel(green),
            blue: to_channel(blue),
        },
        luminosity: 1.0,
    })
}
