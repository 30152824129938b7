use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;

/// Source of "now" for anything that renders relative time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time zone slot bounds are shown in.
///
/// The offset is resolved at each instant, so slots on either side of a
/// daylight saving change keep their own wall-clock hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayZone {
    /// The host's local zone
    #[default]
    Local,
    /// An IANA zone, e.g. `Asia/Shanghai`
    Named(Tz),
    /// A constant offset from UTC
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Formats `instant` as wall-clock time in this zone with a strftime `pattern`.
    pub fn format(&self, instant: DateTime<Utc>, pattern: &str) -> String {
        match self {
            Self::Local => instant.with_timezone(&Local).format(pattern).to_string(),
            Self::Named(zone) => instant.with_timezone(zone).format(pattern).to_string(),
            Self::Fixed(offset) => instant.with_timezone(offset).format(pattern).to_string(),
        }
    }
}
