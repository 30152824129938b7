use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

/// Payload returned by `GET /admin/system/server-time`.
///
/// Every field is optional on the wire since a failing backend answers with
/// `{"error": ...}` only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerTimeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_reservation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A complete server time report, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerTime {
    pub server_time: String,
    pub local_time: String,
    pub latency_ms: f64,
    pub next_reservation_time: String,
}

impl ServerTime {
    /// Latency as shown to admins, e.g. `"12.35 ms"`.
    pub fn latency_label(&self) -> String {
        format!("{:.2} ms", self.latency_ms)
    }
}

impl ServerTimeResponse {
    pub fn into_result(self) -> ClientResult<ServerTime> {
        if let Some(message) = self.error.filter(|message| !message.is_empty()) {
            return Err(ClientError::Application(message));
        }

        Ok(ServerTime {
            server_time: required(self.server_time, "server_time")?,
            local_time: required(self.local_time, "local_time")?,
            latency_ms: required(self.latency_ms, "latency_ms")?,
            next_reservation_time: required(self.next_reservation_time, "next_reservation_time")?,
        })
    }
}

impl From<ServerTime> for ServerTimeResponse {
    fn from(report: ServerTime) -> Self {
        Self {
            server_time: Some(report.server_time),
            local_time: Some(report.local_time),
            latency_ms: Some(report.latency_ms),
            next_reservation_time: Some(report.next_reservation_time),
            error: None,
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> ClientResult<T> {
    value.ok_or_else(|| ClientError::decode(format!("missing field `{field}` in server time response")))
}
