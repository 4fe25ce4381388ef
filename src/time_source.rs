//! Time source abstraction for real and simulated clocks.
//!
//! The capture cycle reads the wall clock and sleeps between captures. Both go
//! through [`TimeSource`] so that a whole day of captures can be replayed in a
//! fraction of a second by the `simulate` command and by tests.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

/// Process-wide time source, defaults to [`RealTimeSource`]
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current local time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation backed by the system clock
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Fast-forward clock: every `sleep` advances simulated time instantly.
///
/// Time never moves past `end_time`; once reached, [`TimeSource::is_ended`]
/// reports true and further sleeps are no-ops.
pub struct SimulatedTimeSource {
    end_time: DateTime<Local>,
    current: Mutex<DateTime<Local>>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>) -> Self {
        Self {
            end_time,
            current: Mutex::new(start_time),
        }
    }

    fn current_time(&self) -> DateTime<Local> {
        match self.current.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let step = ChronoDuration::milliseconds(duration.as_millis() as i64);
        let mut guard = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = (*guard + step).min(self.end_time);
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a naive wall-clock string in the format "YYYY-MM-DD HH:MM:SS"
pub fn parse_naive_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as local time
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    let naive = parse_naive_datetime(s)?;
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> DateTime<Local> {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn test_simulated_sleep_advances_time() {
        let source =
            SimulatedTimeSource::new(local("2024-06-01 12:00:00"), local("2024-06-01 13:00:00"));

        source.sleep(StdDuration::from_secs(40));
        assert_eq!(source.now(), local("2024-06-01 12:00:40"));
        assert!(!source.is_ended());
    }

    #[test]
    fn test_simulated_time_caps_at_end() {
        let source =
            SimulatedTimeSource::new(local("2024-06-01 12:00:00"), local("2024-06-01 12:10:00"));

        source.sleep(StdDuration::from_secs(1200));
        assert_eq!(source.now(), local("2024-06-01 12:10:00"));
        assert!(source.is_ended());
    }

    #[test]
    fn test_parse_datetime_rejects_bad_format() {
        assert!(parse_naive_datetime("2024-06-01T12:00").is_err());
        assert!(parse_naive_datetime("2024-06-01 12:00:00").is_ok());
    }
}
