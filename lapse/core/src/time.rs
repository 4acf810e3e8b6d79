//! Time constants, unit conversion and duration formatting

use core::fmt::{self, Write};

use heapless::String;

/// Seconds in one day
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Seconds in one hour
pub const SECONDS_PER_HOUR: u32 = 3_600;

/// Seconds in one minute
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Capacity of a formatted duration.
///
/// The longest output is `u32::MAX` seconds as `D:HH:MM:SS`, which is
/// `49710:06:28:15` (14 bytes).
pub const TIME_STRING_CAPACITY: usize = 16;

/// Owned, fixed-capacity duration text such as `01:02:03`.
pub type TimeString = String<TIME_STRING_CAPACITY>;

/// Direction of a millisecond/second conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeDirection {
    /// Divide by 1000
    MillisecondsToSeconds,
    /// Multiply by 1000
    SecondsToMilliseconds,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimeDirection {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::MillisecondsToSeconds => defmt::write!(fmt, "ms->s"),
            Self::SecondsToMilliseconds => defmt::write!(fmt, "s->ms"),
        }
    }
}

/// Converts `value` between milliseconds and seconds.
///
/// Seconds to milliseconds wraps on overflow, matching the tick arithmetic.
pub const fn convert_time(value: u32, direction: TimeDirection) -> u32 {
    match direction {
        TimeDirection::MillisecondsToSeconds => value / 1000,
        TimeDirection::SecondsToMilliseconds => value.wrapping_mul(1000),
    }
}

/// Formats whole seconds as `HH:MM:SS`, or `D:HH:MM:SS` once a day has passed.
///
/// ```
/// use lapse_core::sec_to_time;
///
/// assert_eq!(sec_to_time(3661).as_str(), "01:01:01");
/// assert_eq!(sec_to_time(90061).as_str(), "1:01:01:01");
/// ```
pub fn sec_to_time(secs: u32) -> TimeString {
    let days = secs / SECONDS_PER_DAY;
    let hours = (secs % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = secs % SECONDS_PER_MINUTE;

    let mut out = TimeString::new();
    // Cannot overflow: TIME_STRING_CAPACITY covers the longest rendering.
    let _ = if days > 0 {
        write!(out, "{}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        write!(out, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    };
    out
}

/// Writes whole seconds as `HH:MM:SS` without a day field.
///
/// Hours keep counting past 23, so long spans render as e.g. `30:00:00`.
pub fn write_hms<W: Write>(out: &mut W, secs: u32) -> fmt::Result {
    let hours = secs / SECONDS_PER_HOUR;
    let minutes = (secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = secs % SECONDS_PER_MINUTE;
    write!(out, "{:02}:{:02}:{:02}", hours, minutes, seconds)
}
