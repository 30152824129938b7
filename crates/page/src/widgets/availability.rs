//! # Room Availability
//!
//! Fetches the free slots of a room for a day and renders them as a table of
//! selectable rows. Choosing a row copies its bounds into the reservation form.
//!
//! Only the response of the most recently issued request is applied: every
//! call takes a new generation number and a response whose generation is no
//! longer current is dropped without touching the page.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pianoroom_core::{
    models::{
        availability::{AvailabilityQuery, AvailabilityResponse},
        time_slot::TimeSlot,
    },
    time_format::{format_duration, format_time},
};
use tracing::{debug, error, warn};

use crate::api::ReservationApi;
use crate::clock::DisplayZone;
use crate::dom::{Document, Element, EventKind, ScrollBehavior};
use crate::widgets::alert::{AlertKind, AlertPresenter};

/// Shown instead of a table when a room has no usable slots.
pub const NO_AVAILABILITY_MESSAGE: &str =
    "No availability information found for this room on the selected date.";

const TABLE_HEADERS: [&str; 4] = ["Start Time", "End Time", "Duration", "Action"];

/// The reservation form fields a selected slot is written into.
///
/// Compact values go to `start_time`/`end_time` and display values to the
/// `_display` fields; each pair is only written when both of its fields exist.
#[derive(Debug, Clone, Default)]
pub struct ReservationForm {
    pub start_time: Option<Element>,
    pub end_time: Option<Element>,
    pub start_time_display: Option<Element>,
    pub end_time_display: Option<Element>,
    pub form: Option<Element>,
}

impl ReservationForm {
    pub fn from_document(document: &Document) -> Self {
        Self {
            start_time: document.input_by_name("start_time"),
            end_time: document.input_by_name("end_time"),
            start_time_display: document.input_by_name("start_time_display"),
            end_time_display: document.input_by_name("end_time_display"),
            form: document.get_element_by_id("reservation-form"),
        }
    }

    /// Writes a slot given as compact `HHMM` bounds and scrolls the form into view.
    pub fn select(&self, start: &str, end: &str) {
        if let (Some(start_field), Some(end_field)) = (&self.start_time, &self.end_time) {
            start_field.set_value(start);
            end_field.set_value(end);
        }

        if let (Some(start_display), Some(end_display)) =
            (&self.start_time_display, &self.end_time_display)
        {
            start_display.set_value(&format_time(start));
            end_display.set_value(&format_time(end));
        }

        match &self.form {
            Some(form) => form.scroll_into_view(ScrollBehavior::Smooth),
            None => debug!("No reservation form to scroll to"),
        }
    }
}

/// Renders a slot list into the availability container.
#[derive(Debug, Clone)]
pub struct AvailabilityRenderer {
    container: Element,
    form: ReservationForm,
    zone: DisplayZone,
}

impl AvailabilityRenderer {
    /// `zone` decides the wall-clock hours and minutes shown for each slot.
    pub fn new(container: Element, form: ReservationForm, zone: DisplayZone) -> Self {
        Self {
            container,
            form,
            zone,
        }
    }

    /// Replaces the container's content and returns the number of rows rendered.
    pub fn render(&self, slots: &[TimeSlot]) -> usize {
        self.container.clear();

        let rows: Vec<Element> = slots
            .iter()
            .filter(|slot| {
                if !slot.is_valid() {
                    warn!(start = %slot.start_time, end = %slot.end_time, "Skipping slot that does not end after it starts");
                }
                slot.is_valid()
            })
            .map(|slot| self.render_row(slot))
            .collect();

        if rows.is_empty() {
            self.container.append_child(
                Element::new("div")
                    .with_class("alert alert-info")
                    .with_text(NO_AVAILABILITY_MESSAGE),
            );
            return 0;
        }

        let header_row = Element::new("tr");
        for title in TABLE_HEADERS {
            header_row.append_child(Element::new("th").with_text(title));
        }

        let body = Element::new("tbody");
        let count = rows.len();
        for row in rows {
            body.append_child(row);
        }

        self.container.append_child(
            Element::new("table")
                .with_class("table table-striped table-bordered")
                .with_child(Element::new("thead").with_child(header_row))
                .with_child(body),
        );
        count
    }

    fn render_row(&self, slot: &TimeSlot) -> Element {
        let button = Element::new("button")
            .with_attribute("type", "button")
            .with_class("btn btn-sm btn-primary select-time-btn")
            .with_attribute("data-start-time", &self.zone.format(slot.start_time, "%H%M"))
            .with_attribute("data-end-time", &self.zone.format(slot.end_time, "%H%M"))
            .with_text("Select");

        let form = self.form.clone();
        button.add_event_listener(EventKind::Click, move |button, _| {
            let start = button.data("start-time").unwrap_or_default();
            let end = button.data("end-time").unwrap_or_default();
            form.select(&start, &end);
        });

        Element::new("tr")
            .with_child(cell(&self.zone.format(slot.start_time, "%H:%M")))
            .with_child(cell(&self.zone.format(slot.end_time, "%H:%M")))
            .with_child(cell(&format_duration(slot.duration_minutes())))
            .with_child(Element::new("td").with_child(button))
    }
}

fn cell(text: &str) -> Element {
    Element::new("td").with_text(text)
}

/// What a single availability check ended up doing to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A parameter was missing; nothing was requested.
    Skipped,
    /// The slot list was rendered with this many rows.
    Rendered(usize),
    /// An error was surfaced as an alert.
    Failed,
    /// A newer request was issued while this one was in flight.
    Superseded,
}

/// Requests availability and drives the spinner, the container and the alerts.
#[derive(Clone)]
pub struct AvailabilityFetcher {
    api: Arc<dyn ReservationApi>,
    container: Element,
    spinner: Element,
    renderer: AvailabilityRenderer,
    alerts: AlertPresenter,
    generation: Arc<AtomicU64>,
}

impl AvailabilityFetcher {
    pub fn new(
        api: Arc<dyn ReservationApi>,
        container: Element,
        spinner: Element,
        renderer: AvailabilityRenderer,
        alerts: AlertPresenter,
    ) -> Self {
        Self {
            api,
            container,
            spinner,
            renderer,
            alerts,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Checks `room_id` on `date` (`YYYY-MM-DD`). Both are required.
    ///
    /// The container is hidden and the spinner shown while the request is in
    /// flight. Whether the request succeeds or fails, the spinner is hidden and
    /// the container shown again once the latest request completes. On failure
    /// the container is left empty.
    pub async fn check_room_availability(&self, room_id: &str, date: &str) -> FetchOutcome {
        let query = AvailabilityQuery::new(room_id, date);
        if !query.is_complete() {
            debug!(room_id, date, "Room or date missing, not checking availability");
            return FetchOutcome::Skipped;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.container.set_hidden(true);
        self.spinner.set_hidden(false);

        let result = self
            .api
            .check_availability(&query)
            .await
            .and_then(AvailabilityResponse::into_slots);

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, room_id, date, "Discarding superseded availability response");
            return FetchOutcome::Superseded;
        }

        self.spinner.set_hidden(true);
        self.container.set_hidden(false);

        match result {
            Ok(slots) => FetchOutcome::Rendered(self.renderer.render(&slots)),
            Err(err) => {
                error!(%err, room_id, date, "Availability check failed");
                self.container.clear();
                self.alerts
                    .show_alert(AlertKind::Danger, &format!("Error: {err}"));
                FetchOutcome::Failed
            }
        }
    }
}
