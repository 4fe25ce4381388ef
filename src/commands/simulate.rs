//! `skycam simulate`: replay the capture loop on a fast-forward clock.
//!
//! A synthetic camera stands in for the hardware. Its frames get brighter with
//! the sun's progress between sunrise and sunset and with longer exposures,
//! and some hours of the night are cloudy, so mode changes, shutter feedback
//! and the clear-sky streak can all be watched over a simulated day in well
//! under a second.

use anyhow::Result;
use chrono::{DateTime, Local, Timelike};
use std::f64::consts::PI;
use std::sync::Arc;

use crate::cycle::{
    Camera, Capture, CaptureCycle, ClassifierCapability, ClearSkyNotifier, CycleOutcome,
};
use crate::exposure::{BrightnessSample, CaptureParameters, DaylightWindow, ExposureModeController};
use crate::geo::{EphemerisCalculator, UtcOffset};
use crate::logger::Log;
use crate::time_source::{self, SimulatedTimeSource, TimeSource};

// Response per microsecond of exposure at ISO 100
const DAYLIGHT_RADIANCE: f64 = 2e-3;
const STARLIGHT_RADIANCE: f64 = 5e-8;
// Moonlit or light-polluted cloud
const CLOUD_GLOW: f64 = 4.0;
const SUN_DISC_FRACTION: f64 = 0.01;
const LIT_CLOUD_FRACTION: f64 = 0.1;

/// Camera that renders a brightness sample from the simulated sky.
pub struct SyntheticCamera {
    ephemeris: EphemerisCalculator,
    utc_offset: UtcOffset,
    time_source: Arc<dyn TimeSource>,
}

impl SyntheticCamera {
    pub fn new(
        ephemeris: EphemerisCalculator,
        utc_offset: UtcOffset,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            ephemeris,
            utc_offset,
            time_source,
        }
    }

    /// 0 outside daylight, rising to 1 halfway between sunrise and sunset.
    fn daylight(&self, now: &DateTime<Local>) -> f64 {
        let local = now.naive_local();
        let Ok(times) = self.ephemeris.times(&local) else {
            // Polar day or night; assume a dim sky either way
            return 0.1;
        };
        let window = DaylightWindow::new(&times, self.utc_offset.hours_at(now));
        let t = i64::from(local.num_seconds_from_midnight());
        if !window.is_day(t) {
            return 0.0;
        }
        let span = (window.sunset - window.sunrise) as f64;
        (PI * (t - window.sunrise) as f64 / span).sin()
    }
}

/// Clouds cover every other three-hour block of the clock.
fn is_cloudy(now: &DateTime<Local>) -> bool {
    (now.hour() / 3) % 2 == 1
}

/// Brightness of a frame of the simulated sky.
pub fn scene_sample(daylight: f64, cloudy: bool, parameters: &CaptureParameters) -> BrightnessSample {
    let exposure = parameters.shutter as f64 * parameters.gain as f64 / 100.0;
    let sky = if cloudy {
        STARLIGHT_RADIANCE * CLOUD_GLOW
    } else {
        STARLIGHT_RADIANCE
    };
    let radiance = daylight * DAYLIGHT_RADIANCE + sky;
    let brightness = 255.0 * (1.0 - (-exposure * radiance).exp());

    let bright_fraction = if daylight > 0.0 {
        SUN_DISC_FRACTION * daylight * brightness / 255.0
    } else if cloudy {
        LIT_CLOUD_FRACTION
    } else {
        0.0
    };

    BrightnessSample::new(brightness, bright_fraction)
}

impl Camera for SyntheticCamera {
    fn capture(&mut self, parameters: &CaptureParameters) -> Result<Capture> {
        let now = self.time_source.now();
        Ok(Capture {
            sample: scene_sample(self.daylight(&now), is_cloudy(&now), parameters),
            sky_frame: None,
        })
    }
}

/// Notifier that only logs.
#[derive(Default)]
pub struct LoggingNotifier;

impl ClearSkyNotifier for LoggingNotifier {
    fn notify_clear_sky(&mut self) -> Result<()> {
        log_indented!("Clear sky notification (simulated, nothing sent)");
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
struct SimulationSummary {
    captures: u64,
    failed: u64,
    mode_changes: u64,
    adjustments: u64,
    notifications: u64,
}

impl SimulationSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        if outcome.captured {
            self.captures += 1;
        } else {
            self.failed += 1;
        }
        if outcome.report.transition.is_some() {
            self.mode_changes += 1;
        }
        if outcome.report.adjustment.is_some() {
            self.adjustments += 1;
        }
        if outcome.report.notify_clear_sky {
            self.notifications += 1;
        }
    }

    fn log(&self, cycles: u64) {
        log_block_start!("Simulation complete");
        log_indented!("Cycles: {}", cycles);
        log_indented!("Captures: {} ({} failed)", self.captures, self.failed);
        log_indented!("Mode changes: {}", self.mode_changes);
        log_indented!("Shutter adjustments: {}", self.adjustments);
        log_indented!("Clear sky notifications: {}", self.notifications);
    }
}

/// Handle the simulate command.
///
/// # Arguments
/// * `start_time` - Start time in format "YYYY-MM-DD HH:MM:SS"
/// * `end_time` - End time in format "YYYY-MM-DD HH:MM:SS"
/// * `log_to_file` - Write the session to a log file instead of the terminal
pub fn handle_simulate_command(start_time: String, end_time: String, log_to_file: bool) -> Result<()> {
    let start = time_source::parse_datetime(&start_time)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {}", e))?;
    let end = time_source::parse_datetime(&end_time)
        .map_err(|e| anyhow::anyhow!("Invalid end time: {}", e))?;

    if end <= start {
        anyhow::bail!("End time must be after start time");
    }

    // Initialize the simulated time source BEFORE any logging so every line is stamped
    let sim_source = Arc::new(SimulatedTimeSource::new(start, end));
    time_source::init_time_source(sim_source.clone());

    let _log_guard = if log_to_file {
        let log_filename = format!(
            "skycam-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        );
        println!("Writing simulation log to {log_filename}");
        Some(Log::start_file_logging(log_filename)?)
    } else {
        None
    };

    log_version!();
    log_block_start!("Simulation Mode");
    let duration = end.signed_duration_since(start);
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );

    let config = super::load_config(true)?;
    let ephemeris = config.ephemeris()?;
    let utc_offset = config.resolve_utc_offset()?;
    let controller = ExposureModeController::new(config.exposure_settings());
    let camera = SyntheticCamera::new(ephemeris.clone(), utc_offset, sim_source.clone());

    let mut cycle = CaptureCycle::new(
        ephemeris,
        controller,
        utc_offset,
        Box::new(camera),
        ClassifierCapability::Absent,
        Box::new(LoggingNotifier),
        sim_source,
    );

    let mut summary = SimulationSummary::default();
    let cycles = cycle.run(|outcome| {
        summary.record(outcome);
        false
    });

    summary.log(cycles);
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("simulate - Replay the capture loop on a simulated clock");
    log_block_start!("Usage: skycam simulate <start> <end> [--log]");
    log_block_start!("Arguments:");
    log_indented!("<start>  Local start time, \"YYYY-MM-DD HH:MM:SS\"");
    log_indented!("<end>    Local end time, \"YYYY-MM-DD HH:MM:SS\"");
    log_block_start!("Options:");
    log_indented!("-l, --log  Write the session to skycam-simulation-<timestamp>.log");
    log_block_start!("Notes:");
    log_indented!("A synthetic camera replaces the hardware and clear-sky");
    log_indented!("notifications are only logged. Time runs as fast as the");
    log_indented!("loop can evaluate.");
    log_block_start!("Examples:");
    log_indented!("skycam simulate \"2024-06-20 12:00:00\" \"2024-06-22 12:00:00\"");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::ExposureMode;
    use crate::geo::GeoCoordinate;
    use chrono::{NaiveDate, TimeZone};

    fn parameters(mode: ExposureMode, shutter: i64, gain: i64) -> CaptureParameters {
        CaptureParameters {
            mode,
            shutter,
            gain,
            saturation: mode.saturation(),
        }
    }

    fn local(hour: u32) -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    #[test]
    fn test_noon_first_day_frame_is_well_exposed() {
        let sample = scene_sample(1.0, false, &parameters(ExposureMode::Day, 500, 100));
        // 255 * (1 - e^-1)
        assert!((sample.average_brightness - 161.19).abs() < 0.1);
        assert!(sample.bright_fraction < 0.007);
    }

    #[test]
    fn test_night_default_overexposes_slightly() {
        let sample = scene_sample(0.0, false, &parameters(ExposureMode::Night, 4_500_000, 800));
        assert!(sample.average_brightness > 200.0);
        assert_eq!(sample.bright_fraction, 0.0);

        let cloudy = scene_sample(0.0, true, &parameters(ExposureMode::Night, 4_500_000, 800));
        assert!(cloudy.average_brightness > sample.average_brightness);
        assert_eq!(cloudy.bright_fraction, LIT_CLOUD_FRACTION);
    }

    #[test]
    fn test_cloud_pattern() {
        assert!(!is_cloudy(&local(1)));
        assert!(is_cloudy(&local(4)));
        assert!(!is_cloudy(&local(7)));
        assert!(is_cloudy(&local(22)));
    }

    #[test]
    fn test_synthetic_camera_follows_the_sun() {
        let ephemeris = EphemerisCalculator::new(GeoCoordinate::new(0.0, 0.0).unwrap());
        let start = local(0);
        let clock = Arc::new(SimulatedTimeSource::new(start, local(23)));
        let camera = SyntheticCamera::new(ephemeris, UtcOffset::Fixed(0), clock);

        assert_eq!(camera.daylight(&local(2)), 0.0);
        assert!(camera.daylight(&local(12)) > 0.95);
        assert!(camera.daylight(&local(8)) < camera.daylight(&local(11)));
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let mut summary = SimulationSummary::default();
        let mut outcome = CycleOutcome {
            report: Default::default(),
            parameters: parameters(ExposureMode::Night, 4_500_000, 800),
            captured: true,
        };
        summary.record(&outcome);
        outcome.captured = false;
        outcome.report.notify_clear_sky = true;
        summary.record(&outcome);

        assert_eq!(summary.captures, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.notifications, 1);
        assert_eq!(summary.mode_changes, 0);
    }
}
