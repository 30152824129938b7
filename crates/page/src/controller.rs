//! # Reservation Page Controller
//!
//! Wires the widgets against whatever elements a page provides. A widget whose
//! elements are missing is simply not bound; the others are unaffected.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use pianoroom_core::models::server_time::ServerTime;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::ReservationApi;
use crate::clock::{Clock, DisplayZone};
use crate::dom::{Document, Element};
use crate::widgets::{
    alert::{AlertKind, AlertPresenter},
    availability::{AvailabilityFetcher, AvailabilityRenderer, FetchOutcome, ReservationForm},
    confirm::{ConfirmGuard, ConfirmPrompt},
    countdown::CountdownWidget,
    server_time::{ServerTimeFields, ServerTimeProbe},
    time_input::TimeInputSync,
};

pub const COUNTDOWN_ID: &str = "countdown-timer";
pub const AVAILABILITY_CONTAINER_ID: &str = "availability-container";
pub const LOADING_SPINNER_ID: &str = "loading-spinner";
pub const ALERT_CONTAINER_ID: &str = "alert-container";

/// What [`ReservationPageController::init`] bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageBindings {
    pub countdown: bool,
    pub time_inputs: usize,
    pub confirm_guards: usize,
}

/// Client-side controller of the reservation page.
///
/// Dropping the controller stops the countdown, like unloading the page.
pub struct ReservationPageController {
    document: Document,
    clock: Arc<dyn Clock>,
    alerts: AlertPresenter,
    confirm: ConfirmGuard,
    availability: Option<AvailabilityFetcher>,
    server_time: Option<ServerTimeProbe>,
    bindings: OnceLock<PageBindings>,
    countdown_task: Mutex<Option<JoinHandle<()>>>,
}

impl ReservationPageController {
    /// Resolves every widget's elements from `document` once, up front.
    ///
    /// # Arguments
    ///
    /// * `document` - The page to control
    /// * `api` - Backend used by the availability check and the server time probe
    /// * `prompt` - Answers `data-confirm` questions
    /// * `clock` - Source of "now" for the countdown
    /// * `display_zone` - Zone used to render slot times
    pub fn new(
        document: Document,
        api: Arc<dyn ReservationApi>,
        prompt: Arc<dyn ConfirmPrompt>,
        clock: Arc<dyn Clock>,
        display_zone: DisplayZone,
    ) -> Self {
        let alerts = AlertPresenter::new(document.get_element_by_id(ALERT_CONTAINER_ID));

        let availability = match (
            document.get_element_by_id(AVAILABILITY_CONTAINER_ID),
            document.get_element_by_id(LOADING_SPINNER_ID),
        ) {
            (Some(container), Some(spinner)) => {
                let renderer = AvailabilityRenderer::new(
                    container.clone(),
                    ReservationForm::from_document(&document),
                    display_zone,
                );
                Some(AvailabilityFetcher::new(
                    Arc::clone(&api),
                    container,
                    spinner,
                    renderer,
                    alerts.clone(),
                ))
            }
            _ => None,
        };

        let server_time = ServerTimeFields::from_document(&document)
            .map(|fields| ServerTimeProbe::new(Arc::clone(&api), fields, alerts.clone()));

        Self {
            document,
            clock,
            alerts,
            confirm: ConfirmGuard::new(prompt),
            availability,
            server_time,
            bindings: OnceLock::new(),
            countdown_task: Mutex::new(None),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Binds the countdown, the time inputs and the confirmation guards.
    ///
    /// Only the first call binds anything; later calls return the same result.
    pub fn init(&self) -> PageBindings {
        *self.bindings.get_or_init(|| {
            let bindings = PageBindings {
                countdown: self.bind_countdown(),
                time_inputs: self.bind_time_inputs(),
                confirm_guards: self.bind_confirm_guards(),
            };
            info!(?bindings, "Reservation page initialised");
            bindings
        })
    }

    fn bind_countdown(&self) -> bool {
        let Some(widget) = self
            .document
            .get_element_by_id(COUNTDOWN_ID)
            .and_then(|element| CountdownWidget::from_element(element, Arc::clone(&self.clock)))
        else {
            return false;
        };

        let task = widget.start();
        *self
            .countdown_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = task;
        true
    }

    fn bind_time_inputs(&self) -> usize {
        let inputs = self.document.query_all(|element| {
            element.tag() == "input" && element.attribute("type").as_deref() == Some("time")
        });

        let mut bound = 0;
        for input in inputs {
            let Some(target) = input.data("target") else {
                continue;
            };
            match self.document.input_by_name(&target) {
                Some(hidden) => {
                    TimeInputSync::new(input, hidden).bind();
                    bound += 1;
                }
                None => debug!(target = %target, "Time input targets a missing field"),
            }
        }
        bound
    }

    fn bind_confirm_guards(&self) -> usize {
        self.document
            .query_all(|element| element.has_attribute("data-confirm"))
            .iter()
            .filter(|element| self.confirm.bind(element))
            .count()
    }

    /// Checks and renders a room's availability; a no-op on pages without the
    /// availability container or the loading spinner.
    pub async fn check_room_availability(&self, room_id: &str, date: &str) -> FetchOutcome {
        match &self.availability {
            Some(fetcher) => fetcher.check_room_availability(room_id, date).await,
            None => {
                debug!("Page has no availability container, skipping availability check");
                FetchOutcome::Skipped
            }
        }
    }

    /// Probes the server time; a no-op on pages without `#server-time`.
    pub async fn check_server_time(&self) -> Option<ServerTime> {
        match &self.server_time {
            Some(probe) => probe.check_server_time().await,
            None => None,
        }
    }

    pub fn show_alert(&self, kind: AlertKind, message: &str) -> Option<Element> {
        self.alerts.show_alert(kind, message)
    }
}

impl Drop for ReservationPageController {
    fn drop(&mut self) {
        let task = self
            .countdown_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}
