use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::time_slot::TimeSlot;
use crate::errors::{ClientError, ClientResult};

/// Query for `GET /reservation/check-availability`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub room_id: String,
    /// Calendar day as `YYYY-MM-DD`.
    pub date: String,
}

impl AvailabilityQuery {
    pub fn new(room_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            date: date.into(),
        }
    }

    /// Both parameters are required before anything is sent.
    pub fn is_complete(&self) -> bool {
        !self.room_id.is_empty() && !self.date.is_empty()
    }
}

/// Payload returned by the availability endpoint.
///
/// `openDays`, `startTime` and `endTime` are forwarded by the backend from its
/// upstream service and kept as raw JSON. Entries of `remainingTimeList` that
/// do not decode as a [`TimeSlot`] are skipped with a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[serde(default, deserialize_with = "lenient_slots")]
    pub remaining_time_list: Option<Vec<TimeSlot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_days: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AvailabilityResponse {
    pub fn from_slots(slots: Vec<TimeSlot>) -> Self {
        Self {
            remaining_time_list: Some(slots),
            ..Self::default()
        }
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Splits the payload into its slot list or the application error it carries.
    ///
    /// An empty `error` string counts as no error. A missing slot list is an
    /// empty one.
    pub fn into_slots(self) -> ClientResult<Vec<TimeSlot>> {
        match self.error {
            Some(message) if !message.is_empty() => Err(ClientError::Application(message)),
            _ => Ok(self.remaining_time_list.unwrap_or_default()),
        }
    }
}

fn lenient_slots<'de, D>(deserializer: D) -> Result<Option<Vec<TimeSlot>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(entries) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let slots = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<TimeSlot>(entry.clone()) {
            Ok(slot) => Some(slot),
            Err(err) => {
                warn!(%err, %entry, "Skipping undecodable slot");
                None
            }
        })
        .collect();
    Ok(Some(slots))
}
