use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::dom::{Element, EventKind};

/// How long an alert stays up unless it is closed first.
pub const ALERT_DISMISS_DELAY: Duration = Duration::from_secs(5);

/// Bootstrap contextual colour of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
            AlertKind::Danger => "danger",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders transient, dismissible notifications into the alert container.
///
/// Without a container every call is a no-op. There is no cap on the number
/// of alerts shown at once and no deduplication.
#[derive(Debug, Clone)]
pub struct AlertPresenter {
    container: Option<Element>,
    dismiss_after: Duration,
}

impl AlertPresenter {
    pub fn new(container: Option<Element>) -> Self {
        Self {
            container,
            dismiss_after: ALERT_DISMISS_DELAY,
        }
    }

    pub fn container(&self) -> Option<&Element> {
        self.container.as_ref()
    }

    /// Appends an alert and schedules its removal.
    ///
    /// The auto-dismiss timer needs a Tokio runtime; outside of one the alert
    /// stays until it is closed.
    pub fn show_alert(&self, kind: AlertKind, message: &str) -> Option<Element> {
        let Some(container) = &self.container else {
            debug!(%kind, message, "No alert container, dropping alert");
            return None;
        };

        let alert = Element::new("div")
            .with_class(&format!("alert alert-{kind} alert-dismissible fade show"))
            .with_attribute("role", "alert")
            .with_text(message);

        let close = Element::new("button")
            .with_attribute("type", "button")
            .with_class("btn-close")
            .with_attribute("data-bs-dismiss", "alert")
            .with_attribute("aria-label", "Close");
        {
            let container = container.downgrade();
            let alert = alert.downgrade();
            close.add_event_listener(EventKind::Click, move |_, _| {
                if let (Some(container), Some(alert)) = (container.upgrade(), alert.upgrade()) {
                    dismiss(&container, &alert);
                }
            });
        }
        alert.append_child(close);
        container.append_child(alert.clone());

        match Handle::try_current() {
            Ok(runtime) => {
                let container = container.clone();
                let pending = alert.downgrade();
                let delay = self.dismiss_after;
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(alert) = pending.upgrade() {
                        dismiss(&container, &alert);
                    }
                });
            }
            Err(_) => warn!("No async runtime available, alert will not auto-dismiss"),
        }

        Some(alert)
    }

    /// Closes `alert`. Closing an alert that is already gone is a no-op.
    pub fn dismiss(&self, alert: &Element) -> bool {
        match &self.container {
            Some(container) => dismiss(container, alert),
            None => false,
        }
    }
}

fn dismiss(container: &Element, alert: &Element) -> bool {
    alert.remove_class("show");
    let removed = container.remove_child(alert);
    if removed {
        debug!("Alert dismissed");
    }
    removed
}
