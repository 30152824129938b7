mod test_utils;

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header::COOKIE},
    routing::get,
};
use pianoroom_core::{errors::ClientError, models::availability::AvailabilityQuery};
use pianoroom_page::{
    api::{AVAILABILITY_PATH, HttpReservationApi, ReservationApi, SERVER_TIME_PATH},
    config::ClientConfig,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::test_utils::at;

const SESSION: &str = "session=opaque-login-token";

fn logged_in(headers: &HeaderMap) -> bool {
    headers.get(COOKIE).and_then(|value| value.to_str().ok()) == Some(SESSION)
}

fn unauthorised() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Login required" })))
}

async fn check_availability(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !logged_in(&headers) {
        return unauthorised();
    }
    match (params.get("room_id").map(String::as_str), params.get("date")) {
        (Some("7"), Some(date)) if date == "2025-05-01" => {
            let start = at(20, 0).timestamp_millis();
            let end = at(21, 30).timestamp_millis();
            (
                StatusCode::OK,
                Json(json!({
                    "openDays": [1, 2, 3, 4, 5],
                    "startTime": "20:00",
                    "endTime": "23:00",
                    "remainingTimeList": [{ "startTime": start, "endTime": end }],
                })),
            )
        }
        (Some("7"), Some(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Room is closed on this day" })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing parameters" })),
        ),
    }
}

async fn server_time(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !logged_in(&headers) {
        return unauthorised();
    }
    (
        StatusCode::OK,
        Json(json!({
            "server_time": "2025-05-01 21:59:58 CST",
            "local_time": "2025-05-01 21:59:57",
            "latency_ms": 3.14159,
            "next_reservation_time": "2025-05-02 22:00:00 CST",
        })),
    )
}

/// Serves the two backend endpoints on an ephemeral port.
async fn spawn_backend() -> String {
    let app = Router::new()
        .route(AVAILABILITY_PATH, get(check_availability))
        .route(SERVER_TIME_PATH, get(server_time))
        .route("/broken", get(|| async { "<html>Internal Server Error</html>" }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

fn client(base_url: String, cookie: Option<&str>) -> HttpReservationApi {
    HttpReservationApi::new(ClientConfig {
        base_url,
        session_cookie: cookie.map(str::to_string),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_check_availability_sends_query_and_cookie() {
    let api = client(spawn_backend().await, Some(SESSION));

    let slots = api
        .check_availability(&AvailabilityQuery::new("7", "2025-05-01"))
        .await
        .unwrap()
        .into_slots()
        .unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_time, at(20, 0));
    assert_eq!(slots[0].duration_minutes(), 90);
}

#[tokio::test]
async fn test_error_payload_becomes_application_error() {
    let api = client(spawn_backend().await, Some(SESSION));

    let result = api
        .check_availability(&AvailabilityQuery::new("7", "2025-05-04"))
        .await
        .unwrap()
        .into_slots();

    match result {
        Err(ClientError::Application(message)) => assert_eq!(message, "Room is closed on this day"),
        other => panic!("expected an application error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_session_is_reported_by_backend() {
    let api = client(spawn_backend().await, None);

    let response = api.server_time().await.unwrap();

    assert_eq!(response.error.as_deref(), Some("Login required"));
    assert!(response.into_result().is_err());
}

#[tokio::test]
async fn test_server_time_decodes_report() {
    let api = client(spawn_backend().await, Some(SESSION));

    let report = api.server_time().await.unwrap().into_result().unwrap();

    assert_eq!(report.server_time, "2025-05-01 21:59:58 CST");
    assert_eq!(report.latency_label(), "3.14 ms");
}

#[tokio::test]
async fn test_non_json_body_is_a_transport_error() {
    let base_url = spawn_backend().await;
    // Point the availability endpoint at a route that answers with HTML.
    let api = client(format!("{base_url}/broken?"), Some(SESSION));

    let result = api
        .check_availability(&AvailabilityQuery::new("7", "2025-05-01"))
        .await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
}

#[test]
fn test_unreachable_backend_is_a_transport_error() {
    let api = client("http://127.0.0.1:9".to_string(), Some(SESSION));

    let result = tokio_test::block_on(api.server_time());

    assert!(matches!(result, Err(ClientError::Transport(_))));
}

#[test]
fn test_invalid_cookie_is_rejected() {
    let result = HttpReservationApi::new(ClientConfig {
        session_cookie: Some("session=line\nbreak".to_string()),
        ..ClientConfig::default()
    });

    assert!(matches!(result, Err(ClientError::Validation(_))));
}
