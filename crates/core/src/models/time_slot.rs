use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contiguous available interval for a room.
///
/// The backend relays its upstream reservation service verbatim, which reports
/// bounds as epoch milliseconds; RFC 3339 strings are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// A slot is only usable when it ends strictly after it starts.
    pub fn is_valid(&self) -> bool {
        self.end_time > self.start_time
    }

    /// Length of the slot in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

mod timestamp {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::time_format::parse_target_time;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Fractional(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(ms) => ms,
            RawTimestamp::Fractional(ms) => ms.floor() as i64,
            RawTimestamp::Text(text) => {
                return parse_target_time(&text)
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {text}")));
            }
        };

        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}")))
    }
}
