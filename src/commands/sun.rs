//! `skycam sun`: solar times for the configured location.

use anyhow::Result;

use crate::geo::SolarReport;

pub fn handle_sun_command(at: Option<String>, json: bool) -> Result<()> {
    let config = super::load_config(!json)?;
    let calc = config.ephemeris()?;
    let instant = super::resolve_instant(at.as_deref())?;
    let offset = config.resolve_utc_offset()?.hours_at(&instant);

    let report = SolarReport::new(&calc, instant.naive_local(), offset);

    if json {
        println!("{}", report.to_json()?);
    } else {
        report.log();
        log_end!();
    }
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("sun - Show sunrise, sunset and solar noon");
    log_block_start!("Usage: skycam sun [--at \"YYYY-MM-DD HH:MM:SS\"] [--json]");
    log_block_start!("Options:");
    log_indented!("-a, --at <time>  Local instant to compute for (default: now)");
    log_indented!("-j, --json       Print the report as JSON");
    log_block_start!("Notes:");
    log_indented!("Times come from a short Fourier-series solar model and are");
    log_indented!("truncated to whole minutes. The sunrise crate's times are shown");
    log_indented!("alongside as a reference.");
    log_block_start!("Examples:");
    log_indented!("skycam sun");
    log_indented!("skycam sun --at \"2024-06-21 12:00:00\" --json");
    log_end!();
}
