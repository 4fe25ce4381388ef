//! The capture loop: evaluate, wait, capture, classify, wait.
//!
//! Hardware and network access sit behind three traits so the loop can run
//! against a real camera, the synthetic camera of the `simulate` command, or
//! test doubles. Time is read and slept through the injected
//! [`TimeSource`], so a simulated clock replays a whole night instantly.

use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::constants::*;
use crate::exposure::{
    BrightnessSample, CaptureParameters, CycleInput, CycleReport, ExposureModeController,
    ExposureState, SkyLabel,
};
use crate::geo::{EphemerisCalculator, UtcOffset};
use crate::time_source::TimeSource;

/// 8-bit single-channel image handed to the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayFrame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            bail!(
                "Frame of {width}x{height} needs {expected} pixels, got {}",
                pixels.len()
            );
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Average intensity and the fraction of near-saturated pixels.
    pub fn brightness_sample(&self) -> BrightnessSample {
        if self.pixels.is_empty() {
            return BrightnessSample::new(0.0, 0.0);
        }
        let count = self.pixels.len() as f64;
        let total: u64 = self.pixels.iter().map(|&p| u64::from(p)).sum();
        let bright = self
            .pixels
            .iter()
            .filter(|&&p| p >= BRIGHT_PIXEL_LEVEL)
            .count();

        BrightnessSample::new(total as f64 / count, bright as f64 / count)
    }
}

/// Result of one exposure.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub sample: BrightnessSample,
    /// Frame for the sky classifier, when the driver provides one
    pub sky_frame: Option<GrayFrame>,
}

impl Capture {
    pub fn from_frame(frame: GrayFrame) -> Self {
        Self {
            sample: frame.brightness_sample(),
            sky_frame: Some(frame),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Camera {
    fn capture(&mut self, parameters: &CaptureParameters) -> Result<Capture>;
}

#[cfg_attr(test, mockall::automock)]
pub trait SkyClassifier {
    fn classify(&self, frame: &GrayFrame) -> SkyLabel;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClearSkyNotifier {
    fn notify_clear_sky(&mut self) -> Result<()>;
}

/// Whether a cloud classifier is configured.
pub enum ClassifierCapability {
    /// Clear/cloudy falls back to the bright-region fraction
    Absent,
    Present(Box<dyn SkyClassifier>),
}

impl ClassifierCapability {
    fn classify(&self, frame: Option<&GrayFrame>) -> Option<SkyLabel> {
        match (self, frame) {
            (ClassifierCapability::Present(classifier), Some(frame)) => {
                Some(classifier.classify(frame))
            }
            _ => None,
        }
    }
}

/// What happened during one [`CaptureCycle::run_once`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    pub report: CycleReport,
    pub parameters: CaptureParameters,
    pub captured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingSample {
    sample: BrightnessSample,
    label: Option<SkyLabel>,
}

pub struct CaptureCycle {
    ephemeris: EphemerisCalculator,
    controller: ExposureModeController,
    utc_offset: UtcOffset,
    camera: Box<dyn Camera>,
    classifier: ClassifierCapability,
    notifier: Box<dyn ClearSkyNotifier>,
    time_source: Arc<dyn TimeSource>,
    state: ExposureState,
    pending: Option<PendingSample>,
    long_wait: bool,
}

impl CaptureCycle {
    pub fn new(
        ephemeris: EphemerisCalculator,
        controller: ExposureModeController,
        utc_offset: UtcOffset,
        camera: Box<dyn Camera>,
        classifier: ClassifierCapability,
        notifier: Box<dyn ClearSkyNotifier>,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        let state = controller.initial_state();
        Self {
            ephemeris,
            controller,
            utc_offset,
            camera,
            classifier,
            notifier,
            time_source,
            state,
            pending: None,
            long_wait: false,
        }
    }

    pub fn state(&self) -> &ExposureState {
        &self.state
    }

    /// Sample of the last successful capture, not yet fed to the controller.
    pub fn pending_sample(&self) -> Option<BrightnessSample> {
        self.pending.map(|pending| pending.sample)
    }

    pub fn run_once(&mut self) -> CycleOutcome {
        let now = self.time_source.now();
        let local = now.naive_local();
        let pending = self.pending.take();
        let input = CycleInput {
            time_of_day: local.time(),
            solar_times: self.ephemeris.times(&local),
            utc_offset_hours: self.utc_offset.hours_at(&now),
            sample: pending.map(|p| p.sample),
            sky_label: pending.and_then(|p| p.label),
        };

        let (state, report) = self.controller.evaluate(self.state, &input);
        self.state = state;
        if report.long_wait {
            self.long_wait = true;
        }

        if report.notify_clear_sky {
            match self.notifier.notify_clear_sky() {
                Ok(()) => log_decorated!("Clear sky notification sent"),
                Err(e) => log_error!("Clear sky notification failed: {e:#}"),
            }
        }

        let parameters = self.state.capture_parameters();
        log_debug!(
            "Capture parameters: shutter {} us, gain {}, saturation {}",
            parameters.shutter,
            parameters.gain,
            parameters.saturation
        );

        if self.state.mode.is_day_like() {
            let wait = if self.long_wait {
                DAY_LONG_WAIT_SECS
            } else {
                DAY_CAPTURE_WAIT_SECS
            };
            self.long_wait = false;
            self.time_source.sleep(StdDuration::from_secs(wait));
        }

        let capture = match self.camera.capture(&parameters) {
            Ok(capture) => capture,
            Err(e) => {
                log_error!("Capture failed: {e:#}");
                self.time_source
                    .sleep(StdDuration::from_secs(CAPTURE_RETRY_WAIT_SECS));
                return CycleOutcome {
                    report,
                    parameters,
                    captured: false,
                };
            }
        };

        // Cloud classification only matters for the night streak
        let label = if self.state.mode.is_night() {
            self.classifier.classify(capture.sky_frame.as_ref())
        } else {
            None
        };

        log_decorated!(
            "Frame captured in {} mode (brightness {:.0}, sun area {:.4})",
            self.state.mode,
            capture.sample.average_brightness,
            capture.sample.bright_fraction
        );

        self.pending = Some(PendingSample {
            sample: capture.sample,
            label,
        });

        self.time_source
            .sleep(StdDuration::from_secs(CYCLE_WAIT_SECS));

        CycleOutcome {
            report,
            parameters,
            captured: true,
        }
    }

    /// Repeat [`run_once`](Self::run_once) until `should_stop` returns true or
    /// the time source runs out. Returns the number of cycles run.
    pub fn run<F>(&mut self, mut should_stop: F) -> u64
    where
        F: FnMut(&CycleOutcome) -> bool,
    {
        let mut cycles = 0;
        while !self.time_source.is_ended() {
            let outcome = self.run_once();
            cycles += 1;
            if should_stop(&outcome) {
                break;
            }
        }
        cycles
    }
}
