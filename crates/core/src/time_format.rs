//! Pure string conversions between the time encodings used on the page.
//!
//! - *compact* time: `HHMM`, what the backend expects in form submissions
//! - *display* time: `HH:MM`, what humans see and type

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Rendered by the countdown once the target has been reached.
pub const COUNTDOWN_ARRIVED: &str = "Now!";

const NAIVE_DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Formats the time left until a target as `HH:MM:SS`.
///
/// The duration is floored to whole seconds; anything at or below zero renders
/// [`COUNTDOWN_ARRIVED`]. Hours keep growing past two digits.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds();
    if total <= 0 {
        return COUNTDOWN_ARRIVED.to_string();
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// `"14:30"` -> `"1430"`. Only the first colon is removed.
pub fn to_compact_time(display: &str) -> String {
    display.replacen(':', "", 1)
}

/// `"1430"` -> `"14:30"`. Input that is not exactly four characters long is
/// returned unchanged.
pub fn format_time(compact: &str) -> String {
    if compact.chars().count() != 4 {
        return compact.to_string();
    }

    let hours: String = compact.chars().take(2).collect();
    let minutes: String = compact.chars().skip(2).collect();
    format!("{hours}:{minutes}")
}

/// Whole minutes as `"{h}h {m}m"`, e.g. `90` -> `"1h 30m"`.
pub fn format_duration(total_minutes: i64) -> String {
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Parses a countdown target or a textual slot bound.
///
/// Accepts RFC 3339, naive date-times (read in the host's local time zone)
/// and bare `YYYY-MM-DD` dates (read as UTC midnight).
pub fn parse_target_time(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}
