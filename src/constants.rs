//! Application constants and default values for skycam.
//!
//! Defaults for the exposure controller, the solar formulas, the twilight
//! colour curve and the capture loop timing.

// ═══ Default Location ═══
// Used when no configuration file provides coordinates (East-positive longitude)

pub const DEFAULT_LATITUDE: f64 = 51.2750;
pub const DEFAULT_LONGITUDE: f64 = 1.0870;

// ═══ Solar Formula Constants ═══

pub const DEGREES_PER_RADIAN: f64 = 57.2958;
pub const DAYS_PER_YEAR: f64 = 365.0;
/// Zenith of the sun's upper limb at sunrise, including refraction
pub const SUNRISE_ZENITH_DEGREES: f64 = 90.833;
/// Minute-of-day base used for sunrise and sunset
pub const EVENT_BASE_MINUTES: f64 = 661.0;
/// Minute-of-day base used for solar noon
pub const SOLAR_NOON_BASE_MINUTES: f64 = 720.0;
pub const EQUATION_OF_TIME_SCALE: f64 = 229.18;

// ═══ Colour Temperature ═══

/// Neutral daylight colour on the compressed temperature scale
pub const NEUTRAL_TEMPERATURE: i32 = 66;
/// Deep twilight colour on the compressed temperature scale
pub const TWILIGHT_BASE_TEMPERATURE: i32 = 5;
/// Inputs at or below this value hit a logarithm domain error
pub const MINIMUM_TEMPERATURE_EXCLUSIVE: i32 = 10;

// ═══ Twilight Curve ═══

pub const TWILIGHT_WINDOW_SECS: i64 = 60 * 60;
pub const TWILIGHT_CLOCK_OFFSET_SECS: i64 = 60 * 60;
pub const NIGHT_LUMINOSITY: f64 = 0.033;
pub const LUMINOSITY_RAMP_SECS: i64 = 30;

// ═══ Exposure Defaults ═══
// Shutter durations are in microseconds, gain is an ISO-like sensitivity

pub const DEFAULT_SHUTTER_MIN: i64 = 10;
pub const DEFAULT_SHUTTER_MAX: i64 = 6_000_000;
pub const DEFAULT_SHUTTER_SEED: i64 = 50;
pub const DEFAULT_SHUTTER_DAY_FIRST: i64 = 500;
pub const DEFAULT_SHUTTER_DAY: i64 = 4_500_000;
pub const DEFAULT_SHUTTER_NIGHT: i64 = 4_500_000;

pub const DEFAULT_GAIN_MIN: i64 = 100;
pub const DEFAULT_GAIN_MAX: i64 = 800;
pub const DEFAULT_GAIN_SEED: i64 = 800;
pub const DEFAULT_GAIN_HIGH: i64 = 800;
pub const DEFAULT_GAIN_NIGHT: i64 = 800;

pub const DEFAULT_DAY_BRIGHT_THRESHOLD: f64 = 180.0;
pub const DEFAULT_DAY_SUN_AREA_THRESHOLD: f64 = 0.007;
pub const DEFAULT_DAY_DIM_THRESHOLD: f64 = 100.0;
pub const DEFAULT_DAY_DIM_SUN_AREA_THRESHOLD: f64 = 0.02;
pub const DEFAULT_SHUTTER_INCREASE_FACTOR: f64 = 1.2;

pub const DEFAULT_NIGHT_BRIGHT_THRESHOLD: f64 = 200.0;
pub const DEFAULT_NIGHT_DARK_THRESHOLD: f64 = 10.0;
pub const DEFAULT_SHUTTER_DECREASE_FACTOR: f64 = 1.3;

pub const DEFAULT_CLEAR_SKY_STREAK: u32 = 20;
pub const DEFAULT_CLOUD_FRACTION_THRESHOLD: f64 = 0.05;
/// Pixels at or above this level count towards the bright-region fraction
pub const BRIGHT_PIXEL_LEVEL: u8 = 240;

/// Window before sunset in which the day mode may switch to high gain
pub const HIGH_GAIN_WINDOW_SECS: i64 = 60 * 60;
/// Sunsets corrected past this hour suppress night mode
pub const LATEST_NIGHT_SUNSET_HOUR: i64 = 23;

pub const DAY_SATURATION: i32 = 20;
pub const NIGHT_SATURATION: i32 = 0;

// ═══ Validation Limits ═══

pub const MINIMUM_UTC_OFFSET: i32 = -12;
pub const MAXIMUM_UTC_OFFSET: i32 = 14;

// ═══ Capture Loop Timing ═══

pub const DAY_CAPTURE_WAIT_SECS: u64 = 30;
pub const DAY_LONG_WAIT_SECS: u64 = 1200;
pub const CYCLE_WAIT_SECS: u64 = 40;
pub const CAPTURE_RETRY_WAIT_SECS: u64 = 30;

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;
