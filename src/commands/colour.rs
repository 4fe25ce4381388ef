//! `skycam colour`: the twilight lighting cue for an instant.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::colour::{ColourSample, Rgb, TwilightColourController};
use crate::geo::EphemerisCalculator;

#[derive(Debug, Clone, Serialize)]
pub struct ColourReport {
    pub at: NaiveDateTime,
    pub rgb: Rgb,
    pub luminosity: f64,
    /// Channels with the luminosity applied
    pub scaled: Rgb,
}

impl ColourReport {
    pub fn new(calc: EphemerisCalculator, at: NaiveDateTime) -> Result<Self> {
        let controller = TwilightColourController::new(calc);
        let ColourSample { rgb, luminosity } = controller
            .colour_for_instant(&at)
            .with_context(|| format!("No twilight colour for {}", at.format("%Y-%m-%d")))?;

        Ok(Self {
            at,
            rgb,
            luminosity,
            scaled: ColourSample { rgb, luminosity }.scaled(),
        })
    }

    pub fn log(&self) {
        log_block_start!("Twilight colour at {}", self.at.format("%Y-%m-%d %H:%M:%S"));
        log_indented!(
            "RGB: ({}, {}, {}) #{:02x}{:02x}{:02x}",
            self.rgb.red,
            self.rgb.green,
            self.rgb.blue,
            self.rgb.red,
            self.rgb.green,
            self.rgb.blue
        );
        log_indented!("Luminosity: {:.3}", self.luminosity);
        log_indented!(
            "Scaled: ({}, {}, {})",
            self.scaled.red,
            self.scaled.green,
            self.scaled.blue
        );
    }
}

pub fn handle_colour_command(at: Option<String>, json: bool) -> Result<()> {
    let config = super::load_config(!json)?;
    let calc = config.ephemeris()?;
    let instant = super::resolve_instant(at.as_deref())?;

    let report = ColourReport::new(calc, instant.naive_local())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.log();
        log_end!();
    }
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("colour - Show the twilight display colour");
    log_block_start!("Usage: skycam colour [--at \"YYYY-MM-DD HH:MM:SS\"] [--json]");
    log_block_start!("Options:");
    log_indented!("-a, --at <time>  Local instant to compute for (default: now)");
    log_indented!("-j, --json       Print the colour as JSON");
    log_block_start!("Notes:");
    log_indented!("Neutral white by day and a colour ramp in the hour after sunrise");
    log_indented!("and the hour before sunset. At night, and in the first minutes of");
    log_indented!("each ramp, the colour scale is out of range and an error is shown.");
    log_end!();
}
