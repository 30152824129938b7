use std::sync::Arc;

use pianoroom_core::models::server_time::{ServerTime, ServerTimeResponse};
use tracing::{error, info};

use crate::api::ReservationApi;
use crate::dom::{Document, Element};
use crate::widgets::alert::{AlertKind, AlertPresenter};

/// Display fields of the admin system page.
#[derive(Debug, Clone)]
pub struct ServerTimeFields {
    pub server_time: Element,
    pub local_time: Option<Element>,
    pub latency: Option<Element>,
    pub next_reservation_time: Option<Element>,
}

impl ServerTimeFields {
    /// `None` unless the page has a `#server-time` element.
    pub fn from_document(document: &Document) -> Option<Self> {
        Some(Self {
            server_time: document.get_element_by_id("server-time")?,
            local_time: document.get_element_by_id("local-time"),
            latency: document.get_element_by_id("latency"),
            next_reservation_time: document.get_element_by_id("next-reservation-time"),
        })
    }

    fn show(&self, report: &ServerTime) {
        self.server_time.set_text_content(&report.server_time);
        if let Some(local_time) = &self.local_time {
            local_time.set_text_content(&report.local_time);
        }
        if let Some(latency) = &self.latency {
            latency.set_text_content(&report.latency_label());
        }
        if let Some(next) = &self.next_reservation_time {
            next.set_text_content(&report.next_reservation_time);
        }
    }
}

/// Admin-only probe of the backend's clock and latency.
#[derive(Clone)]
pub struct ServerTimeProbe {
    api: Arc<dyn ReservationApi>,
    fields: ServerTimeFields,
    alerts: AlertPresenter,
}

impl ServerTimeProbe {
    pub fn new(api: Arc<dyn ReservationApi>, fields: ServerTimeFields, alerts: AlertPresenter) -> Self {
        Self { api, fields, alerts }
    }

    /// Fetches and displays the server time report.
    ///
    /// On failure the error is shown as an alert and the previously displayed
    /// values stay as they were.
    pub async fn check_server_time(&self) -> Option<ServerTime> {
        match self
            .api
            .server_time()
            .await
            .and_then(ServerTimeResponse::into_result)
        {
            Ok(report) => {
                info!(server_time = %report.server_time, latency_ms = report.latency_ms, "Server time received");
                self.fields.show(&report);
                Some(report)
            }
            Err(err) => {
                error!(%err, "Server time check failed");
                self.alerts
                    .show_alert(AlertKind::Danger, &format!("Error: {err}"));
                None
            }
        }
    }
}
