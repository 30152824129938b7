#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use pianoroom_core::models::time_slot::TimeSlot;
use pianoroom_page::{
    ReservationPageController,
    api::ReservationApi,
    clock::{Clock, DisplayZone},
    controller::{ALERT_CONTAINER_ID, AVAILABILITY_CONTAINER_ID, LOADING_SPINNER_ID},
    dom::{Document, Element},
    widgets::confirm::{ConfirmPrompt, FixedAnswer},
};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn beijing() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

/// Beijing wall-clock time on 2025-05-01.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    beijing()
        .with_ymd_and_hms(2025, 5, 1, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn slot(hour: u32, minute: u32, minutes: i64) -> TimeSlot {
    let start = at(hour, minute);
    TimeSlot::new(start, start + Duration::minutes(minutes))
}

pub fn input(kind: &str, name: &str) -> Element {
    Element::new("input")
        .with_attribute("type", kind)
        .with_attribute("name", name)
}

/// The reservation page with availability, form and alert elements.
pub fn reservation_page() -> Document {
    let document = Document::new();
    document.append(Element::new("div").with_id(ALERT_CONTAINER_ID));
    document.append(
        Element::new("div")
            .with_id(LOADING_SPINNER_ID)
            .with_class("spinner-border d-none"),
    );
    document.append(Element::new("div").with_id(AVAILABILITY_CONTAINER_ID));
    document.append(
        Element::new("form")
            .with_id("reservation-form")
            .with_child(input("hidden", "start_time"))
            .with_child(input("hidden", "end_time"))
            .with_child(input("text", "start_time_display"))
            .with_child(input("text", "end_time_display")),
    );
    document
}

/// The admin system page with the server time fields.
pub fn admin_system_page() -> Document {
    let document = Document::new();
    document.append(Element::new("div").with_id(ALERT_CONTAINER_ID));
    for id in ["server-time", "local-time", "latency", "next-reservation-time"] {
        document.append(Element::new("span").with_id(id).with_text("prior"));
    }
    document
}

pub fn controller(document: &Document, api: impl ReservationApi + 'static) -> ReservationPageController {
    controller_with(document, api, FixedAnswer(true), ManualClock::new(at(21, 0)))
}

pub fn controller_with(
    document: &Document,
    api: impl ReservationApi + 'static,
    prompt: impl ConfirmPrompt + 'static,
    clock: Arc<ManualClock>,
) -> ReservationPageController {
    ReservationPageController::new(
        document.clone(),
        Arc::new(api),
        Arc::new(prompt),
        clock,
        DisplayZone::Fixed(beijing()),
    )
}

pub fn element(document: &Document, id: &str) -> Element {
    document
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("missing #{id}"))
}

pub fn alert_texts(document: &Document) -> Vec<String> {
    element(document, ALERT_CONTAINER_ID)
        .children()
        .iter()
        .map(Element::text_content)
        .collect()
}
