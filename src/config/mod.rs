//! Configuration for the camera's location, clock and exposure tuning.
//!
//! ## Configuration Sources
//!
//! `skycam.toml` is read from `$XDG_CONFIG_HOME/skycam/`, or from the directory
//! given with `--config`. A missing default file is not an error: the built-in
//! defaults (51.2750 N 1.0870 E) are used.
//!
//! ## Configuration Structure
//!
//! ```toml
//! latitude = 51.2750          # Degrees, North positive (-90 to 90)
//! longitude = 1.0870          # Degrees, East positive (-180 to 180)
//! utc_offset = 1              # Whole hours (-12 to 14); overrides timezone
//! timezone = "Europe/London"  # IANA name, follows daylight saving
//!
//! [exposure]
//! clear_sky_streak = 20       # Clear night frames before notifying
//! cloud_fraction_threshold = 0.05
//!
//! [exposure.night_limits]
//! shutter_max = 6000000       # Microseconds
//! ```
//!
//! Without `utc_offset` or `timezone` the system's local offset is used.

pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::constants::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
use crate::exposure::ExposureSettings;
use crate::geo::{EphemerisCalculator, GeoCoordinate, UtcOffset};

pub use loading::{get_config_path, load, load_from_path, set_config_dir};

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub latitude: Option<f64>,
    /// East positive, as geolocation services report it
    pub longitude: Option<f64>,
    pub utc_offset: Option<i32>,
    pub timezone: Option<String>,
    pub exposure: Option<ExposureSettings>,
}

impl Config {
    /// Camera location, with longitude converted to the calculator's convention.
    pub fn coordinate(&self) -> Result<GeoCoordinate> {
        let latitude = self.latitude.unwrap_or(DEFAULT_LATITUDE);
        let longitude = self.longitude.unwrap_or(DEFAULT_LONGITUDE);
        GeoCoordinate::from_east_positive(latitude, longitude)
            .context("Invalid camera location in configuration")
    }

    pub fn ephemeris(&self) -> Result<EphemerisCalculator> {
        Ok(EphemerisCalculator::new(self.coordinate()?))
    }

    pub fn exposure_settings(&self) -> ExposureSettings {
        self.exposure.unwrap_or_default()
    }

    /// `utc_offset` first, then `timezone`, then the system clock.
    pub fn resolve_utc_offset(&self) -> Result<UtcOffset> {
        if let Some(hours) = self.utc_offset {
            return Ok(UtcOffset::Fixed(hours));
        }
        if let Some(name) = &self.timezone {
            let tz: Tz = name
                .parse()
                .map_err(|_| anyhow::anyhow!("Unknown timezone '{name}'"))?;
            return Ok(UtcOffset::Zone(tz));
        }
        Ok(UtcOffset::System)
    }

    /// Print the active settings as a block.
    pub fn log_config(&self, config_path: Option<&str>) {
        log_block_start!("Loaded configuration");
        if let Some(path) = config_path {
            log_indented!("Source: {}", path);
        } else {
            log_indented!("Source: built-in defaults");
        }

        let latitude = self.latitude.unwrap_or(DEFAULT_LATITUDE);
        let longitude = self.longitude.unwrap_or(DEFAULT_LONGITUDE);
        log_indented!(
            "Location: {:.4}°{} {:.4}°{}",
            latitude.abs(),
            if latitude >= 0.0 { "N" } else { "S" },
            longitude.abs(),
            if longitude >= 0.0 { "E" } else { "W" }
        );

        match self.resolve_utc_offset() {
            Ok(offset) => log_indented!("UTC offset: {}", offset.describe()),
            Err(e) => log_indented!("UTC offset: {e}"),
        }

        let exposure = self.exposure_settings();
        log_indented!(
            "Shutter: {}-{} µs (day), {}-{} µs (night)",
            exposure.day_limits.shutter_min,
            exposure.day_limits.shutter_max,
            exposure.night_limits.shutter_min,
            exposure.night_limits.shutter_max
        );
        log_indented!(
            "Gain: ISO {}-{} (day), ISO {}-{} (night)",
            exposure.day_limits.gain_min,
            exposure.day_limits.gain_max,
            exposure.night_limits.gain_min,
            exposure.night_limits.gain_max
        );
        log_indented!("Clear-sky streak: {} frames", exposure.clear_sky_streak);
    }
}
