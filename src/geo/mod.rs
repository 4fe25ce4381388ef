//! Geographic sunrise/sunset calculations.
//!
//! ## Module Structure
//!
//! - [`ephemeris`]: the solar model and [`EphemerisCalculator`]
//! - [`display`]: human and JSON rendering of a day's solar times
//! - [`offset`]: whole-hour UTC offset from a fixed value, a zone or the system
//!
//! Longitude inside this module is West-positive. Configuration and
//! geolocation services use East-positive longitude; the conversion happens
//! once, in [`GeoCoordinate::from_east_positive`].

pub mod display;
pub mod ephemeris;
pub mod offset;

pub use display::SolarReport;
pub use ephemeris::{
    EphemerisCalculator, GeoCoordinate, SolarEvent, SolarEventKind, SolarTimes,
};
pub use offset::UtcOffset;
