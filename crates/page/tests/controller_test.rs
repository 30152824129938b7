mod test_utils;

use pianoroom_page::{
    PageBindings,
    api::MockReservationApi,
    dom::{Document, Element, EventKind},
    widgets::{
        alert::AlertKind,
        availability::FetchOutcome,
        confirm::{FixedAnswer, MockConfirmPrompt},
    },
};
use pretty_assertions::assert_eq;

use crate::test_utils::{ManualClock, alert_texts, at, controller, controller_with, input, reservation_page};

fn booking_page() -> Document {
    let document = reservation_page();
    document.append(
        Element::new("form")
            .with_id("recurring-form")
            .with_child(
                input("time", "start_picker").with_attribute("data-target", "recurring_start"),
            )
            .with_child(input("hidden", "recurring_start"))
            .with_child(input("time", "orphan_picker").with_attribute("data-target", "missing"))
            .with_child(input("time", "plain_picker")),
    );
    document.append(
        Element::new("a")
            .with_attribute("href", "/reservation/recurring/3/delete")
            .with_attribute("data-confirm", "Delete this recurring reservation?"),
    );
    document
}

#[test_log::test(tokio::test)]
async fn test_init_binds_present_widgets_once() {
    let document = booking_page();
    let controller = controller(&document, MockReservationApi::new());

    let expected = PageBindings {
        countdown: false,
        time_inputs: 1,
        confirm_guards: 1,
    };
    assert_eq!(controller.init(), expected);
    assert_eq!(controller.init(), expected);

    let picker = document.input_by_name("start_picker").unwrap();
    assert_eq!(picker.listener_count(EventKind::Change), 1);
}

#[tokio::test]
async fn test_time_input_sync() {
    let document = booking_page();
    let controller = controller(&document, MockReservationApi::new());
    controller.init();

    let picker = document.input_by_name("start_picker").unwrap();
    let hidden = document.input_by_name("recurring_start").unwrap();

    picker.set_value("14:30");
    picker.dispatch(EventKind::Change);
    assert_eq!(hidden.value(), "1430");

    picker.set_value("");
    picker.dispatch(EventKind::Change);
    assert_eq!(hidden.value(), "1430");
}

#[tokio::test]
async fn test_declined_confirmation_prevents_default() {
    let mut prompt = MockConfirmPrompt::new();
    prompt
        .expect_confirm()
        .withf(|message| message.starts_with("Delete this recurring reservation"))
        .times(1)
        .returning(|_| false);

    let document = booking_page();
    let controller = controller_with(&document, MockReservationApi::new(), prompt, ManualClock::new(at(9, 0)));
    controller.init();

    let link = document.query_all(|element| element.has_attribute("data-confirm")).remove(0);
    let event = link.click();

    assert!(event.default_prevented());
    assert!(event.propagation_stopped());
}

#[tokio::test]
async fn test_accepted_confirmation_allows_default() {
    let document = booking_page();
    let controller = controller_with(&document, MockReservationApi::new(), FixedAnswer(true), ManualClock::new(at(9, 0)));
    controller.init();

    let link = document.query_all(|element| element.has_attribute("data-confirm")).remove(0);
    let event = link.click();

    assert!(!event.default_prevented());
    assert!(!event.propagation_stopped());
}

#[tokio::test]
async fn test_bare_page_degrades_to_no_ops() {
    // No expectations: a request from either probe would fail the test.
    let document = Document::new();
    let controller = controller(&document, MockReservationApi::new());

    assert_eq!(controller.init(), PageBindings::default());
    assert_eq!(
        controller.check_room_availability("12", "2025-05-01").await,
        FetchOutcome::Skipped
    );
    assert!(controller.check_server_time().await.is_none());
    assert!(controller.show_alert(AlertKind::Info, "nobody listens").is_none());
}

#[tokio::test]
async fn test_show_alert_delegates_to_container() {
    let document = reservation_page();
    let controller = controller(&document, MockReservationApi::new());

    controller.show_alert(AlertKind::Success, "Reservation created");

    assert_eq!(alert_texts(&document), vec!["Reservation created"]);
}
