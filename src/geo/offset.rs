//! Whole-hour UTC offset used to move solar events onto the local clock.

use chrono::{DateTime, Local, Offset, TimeZone};
use chrono_tz::Tz;

/// Where the offset comes from. Zone and System follow daylight saving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UtcOffset {
    Fixed(i32),
    Zone(Tz),
    System,
}

impl UtcOffset {
    /// Offset in whole hours at the instant `now` (fractional zones truncate toward zero).
    pub fn hours_at(&self, now: &DateTime<Local>) -> i32 {
        let seconds = match self {
            UtcOffset::Fixed(hours) => return *hours,
            UtcOffset::Zone(tz) => tz
                .offset_from_utc_datetime(&now.naive_utc())
                .fix()
                .local_minus_utc(),
            UtcOffset::System => now.offset().local_minus_utc(),
        };
        seconds / 3600
    }

    pub fn describe(&self) -> String {
        match self {
            UtcOffset::Fixed(hours) => format!("UTC{hours:+}"),
            UtcOffset::Zone(tz) => tz.name().to_string(),
            UtcOffset::System => "system local time".to_string(),
        }
    }
}
