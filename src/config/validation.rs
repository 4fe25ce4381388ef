//! Configuration validation functionality.
//!
//! Rejects values the controller cannot work with: coordinates off the globe,
//! impossible UTC offsets, empty or inverted exposure ranges and feedback
//! factors that would not move the shutter.

use anyhow::Result;
use chrono_tz::Tz;

use super::Config;
use crate::constants::*;
use crate::exposure::{ExposureLimits, ExposureSettings};

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if let Some(offset) = config.utc_offset
        && !(MINIMUM_UTC_OFFSET..=MAXIMUM_UTC_OFFSET).contains(&offset)
    {
        anyhow::bail!(
            "utc_offset ({}) must be between {} and {} hours",
            offset,
            MINIMUM_UTC_OFFSET,
            MAXIMUM_UTC_OFFSET
        );
    }

    if let Some(name) = &config.timezone
        && name.parse::<Tz>().is_err()
    {
        anyhow::bail!("timezone '{}' is not a known IANA timezone name", name);
    }

    if let Some(exposure) = &config.exposure {
        validate_exposure(exposure)?;
    }

    Ok(())
}

fn validate_exposure(settings: &ExposureSettings) -> Result<()> {
    validate_limits(&settings.day_limits, "day_limits")?;
    validate_limits(&settings.night_limits, "night_limits")?;

    if settings.shutter_increase_factor <= 1.0 || !settings.shutter_increase_factor.is_finite() {
        anyhow::bail!(
            "shutter_increase_factor ({}) must be greater than 1",
            settings.shutter_increase_factor
        );
    }

    if settings.shutter_decrease_factor <= 1.0 || !settings.shutter_decrease_factor.is_finite() {
        anyhow::bail!(
            "shutter_decrease_factor ({}) must be greater than 1",
            settings.shutter_decrease_factor
        );
    }

    if settings.clear_sky_streak == 0 {
        anyhow::bail!("clear_sky_streak must be at least 1 frame");
    }

    if !(0.0..=1.0).contains(&settings.cloud_fraction_threshold) {
        anyhow::bail!(
            "cloud_fraction_threshold ({}) must be between 0 and 1",
            settings.cloud_fraction_threshold
        );
    }

    for (name, value) in [
        ("day_sun_area_threshold", settings.day_sun_area_threshold),
        ("day_dim_sun_area_threshold", settings.day_dim_sun_area_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("{} ({}) must be between 0 and 1", name, value);
        }
    }

    for (name, value) in [
        ("day_bright_threshold", settings.day_bright_threshold),
        ("day_dim_threshold", settings.day_dim_threshold),
        ("night_bright_threshold", settings.night_bright_threshold),
        ("night_dark_threshold", settings.night_dark_threshold),
    ] {
        if !(0.0..=255.0).contains(&value) {
            anyhow::bail!("{} ({}) must be between 0 and 255", name, value);
        }
    }

    if settings.day_dim_threshold > settings.day_bright_threshold {
        anyhow::bail!(
            "day_dim_threshold ({}) must not exceed day_bright_threshold ({})",
            settings.day_dim_threshold,
            settings.day_bright_threshold
        );
    }

    if settings.night_dark_threshold > settings.night_bright_threshold {
        anyhow::bail!(
            "night_dark_threshold ({}) must not exceed night_bright_threshold ({})",
            settings.night_dark_threshold,
            settings.night_bright_threshold
        );
    }

    Ok(())
}

fn validate_limits(limits: &ExposureLimits, table: &str) -> Result<()> {
    if limits.shutter_min <= 0 || limits.shutter_min > limits.shutter_max {
        anyhow::bail!(
            "{}: shutter range {}-{} µs must be positive and ordered",
            table,
            limits.shutter_min,
            limits.shutter_max
        );
    }

    if limits.gain_min <= 0 || limits.gain_min > limits.gain_max {
        anyhow::bail!(
            "{}: gain range ISO {}-{} must be positive and ordered",
            table,
            limits.gain_min,
            limits.gain_max
        );
    }

    Ok(())
}
