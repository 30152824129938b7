mod test_utils;

use std::time::Duration;

use pianoroom_page::{
    dom::Element,
    widgets::alert::{ALERT_DISMISS_DELAY, AlertKind, AlertPresenter},
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn close_button(alert: &Element) -> Element {
    alert
        .find_first(|element| element.has_class("btn-close"))
        .expect("alert has a close button")
}

#[rstest]
#[case(AlertKind::Success, "alert alert-success alert-dismissible fade show")]
#[case(AlertKind::Info, "alert alert-info alert-dismissible fade show")]
#[case(AlertKind::Warning, "alert alert-warning alert-dismissible fade show")]
#[case(AlertKind::Danger, "alert alert-danger alert-dismissible fade show")]
#[tokio::test]
async fn test_alert_severity_classes(#[case] kind: AlertKind, #[case] classes: &str) {
    let container = Element::new("div");
    let presenter = AlertPresenter::new(Some(container.clone()));

    let alert = presenter.show_alert(kind, "Reservation saved").unwrap();

    assert_eq!(alert.attribute("class").as_deref(), Some(classes));
    assert_eq!(alert.text_content(), "Reservation saved");
    assert!(container.contains_child(&alert));
}

#[tokio::test(start_paused = true)]
async fn test_alert_auto_dismisses_after_delay() {
    let container = Element::new("div");
    let presenter = AlertPresenter::new(Some(container.clone()));

    let alert = presenter.show_alert(AlertKind::Danger, "Error: boom").unwrap();

    tokio::time::sleep(ALERT_DISMISS_DELAY - Duration::from_millis(1)).await;
    assert!(container.contains_child(&alert));

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!container.contains_child(&alert));
    assert!(!alert.has_class("show"));
}

#[tokio::test(start_paused = true)]
async fn test_manual_dismiss_before_timer_is_harmless() {
    let container = Element::new("div");
    let presenter = AlertPresenter::new(Some(container.clone()));

    let alert = presenter.show_alert(AlertKind::Info, "Heads up").unwrap();
    close_button(&alert).click();
    assert!(container.children().is_empty());

    // The pending auto-dismiss fires against an alert that is already gone.
    tokio::time::sleep(ALERT_DISMISS_DELAY * 2).await;
    assert!(container.children().is_empty());
    assert!(!presenter.dismiss(&alert));
}

#[tokio::test(start_paused = true)]
async fn test_alerts_are_not_deduplicated() {
    let container = Element::new("div");
    let presenter = AlertPresenter::new(Some(container.clone()));

    let first = presenter.show_alert(AlertKind::Danger, "Error: same").unwrap();
    let second = presenter.show_alert(AlertKind::Danger, "Error: same").unwrap();
    assert_eq!(container.children().len(), 2);

    assert!(presenter.dismiss(&first));
    assert!(container.contains_child(&second));
}

#[tokio::test]
async fn test_alert_without_container_is_a_no_op() {
    let presenter = AlertPresenter::new(None);
    assert!(presenter.show_alert(AlertKind::Danger, "Error: nowhere").is_none());
}

#[test]
fn test_alert_outside_runtime_stays_until_closed() {
    let container = Element::new("div");
    let presenter = AlertPresenter::new(Some(container.clone()));

    let alert = presenter.show_alert(AlertKind::Warning, "Offline").unwrap();
    assert!(container.contains_child(&alert));

    close_button(&alert).click();
    assert!(!container.contains_child(&alert));
}

#[test]
fn test_open_alert_does_not_keep_container_alive() {
    let container = Element::new("div");
    let presenter = AlertPresenter::new(Some(container.clone()));
    presenter.show_alert(AlertKind::Info, "Never closed").unwrap();

    let weak = container.downgrade();
    drop(presenter);
    drop(container);

    assert!(weak.upgrade().is_none());
}

#[tokio::test]
async fn test_alert_message_is_escaped() {
    let container = Element::new("div");
    let presenter = AlertPresenter::new(Some(container.clone()));

    presenter.show_alert(AlertKind::Danger, "Error: <script>").unwrap();

    assert!(container.inner_html().contains("Error: &lt;script&gt;"));
}
