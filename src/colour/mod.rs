//! Colour temperature mapping and the twilight lighting cue.
//!
//! - [`temperature`]: compressed colour temperature to RGB
//! - [`twilight`]: colour and luminosity for a point in time, driven by the ephemeris

pub mod temperature;
pub mod twilight;

pub use temperature::{ColourSample, Rgb, temperature_to_colour};
pub use twilight::{
    TwilightColourController, colour_for_time_of_day, twilight_luminosity, twilight_temperature,
};
