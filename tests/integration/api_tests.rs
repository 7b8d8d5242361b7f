//! API integration tests
//!
//! Run against a live server whose database holds a shop with mechanic 1
//! working 09:00-18:00 (lunch 14:00-15:00) on 2020-08-05:
//! `cargo test --test api_tests -- --ignored`

use autoshop_server::models::UserClaims;
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Bearer token signed with the server's secret
fn auth_token(user_id: i32) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: format!("customer-{}", user_id),
        user_id,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

async fn post_envelope(client: &Client, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(auth_token(7))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_booking_requires_token() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&json!({"time": "2020-08-05 10:00", "workman_id": 1}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();

    let body = post_envelope(
        &client,
        "/appointments",
        json!({"time": "2020-08-05 10:00", "workman_id": 1, "timezone": "UTC"}),
    )
    .await;
    assert_eq!(body, json!({"is_error": false, "info": "Success"}));

    let body = post_envelope(
        &client,
        "/appointments",
        json!({"time": "05.08.2020 10:00", "workman_id": 1, "timezone": "UTC"}),
    )
    .await;
    assert_eq!(body, json!({"is_error": true, "info": "Chosen time is not available"}));

    let body = post_envelope(
        &client,
        "/appointments/move",
        json!({
            "time": "2020-08-05 10:00",
            "new_time": "2020-08-05 11:00",
            "workman_id": 1,
            "timezone": "UTC"
        }),
    )
    .await;
    assert_eq!(body["is_error"], false);

    let body = post_envelope(
        &client,
        "/appointments/cancel",
        json!({"time": "2020-08-05T11:00:00", "workman_id": 1, "timezone": "UTC"}),
    )
    .await;
    assert_eq!(body["is_error"], false);

    let body = post_envelope(
        &client,
        "/appointments/cancel",
        json!({"time": "2020-08-05T11:00:00", "workman_id": 1, "timezone": "UTC"}),
    )
    .await;
    assert_eq!(body, json!({"is_error": true, "info": "Appointment not found"}));
}

#[tokio::test]
#[ignore]
async fn test_lunch_booking_is_invalid() {
    let client = Client::new();

    let body = post_envelope(
        &client,
        "/appointments",
        json!({"time": "2020-08-05 14:00", "workman_id": 1, "timezone": "UTC"}),
    )
    .await;
    assert_eq!(body, json!({"is_error": true, "info": "Chosen time is not valid"}));
}

#[tokio::test]
#[ignore]
async fn test_unparseable_time_is_bad_request() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .bearer_auth(auth_token(7))
        .json(&json!({"time": "tomorrow morning", "workman_id": 1}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_workload() {
    let client = Client::new();

    let response = client
        .get(format!("{}/workload", BASE_URL))
        .query(&[("date", "2020-08-05"), ("workman_id", "1")])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_error"], false);
    assert!(body["info"].as_str().unwrap().starts_with("Current workload: "));
}

#[tokio::test]
#[ignore]
async fn test_workload_wrong_arguments() {
    let client = Client::new();

    let response = client
        .get(format!("{}/workload", BASE_URL))
        .query(&[("workman_id", "1")])
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({"is_error": true, "info": "Wrong arguments"}));
}

#[tokio::test]
#[ignore]
async fn test_available_time() {
    let client = Client::new();

    let response = client
        .get(format!("{}/available-time", BASE_URL))
        .query(&[
            ("datetime_begin", "2020-08-05 09:00"),
            ("datetime_end", "2020-08-05 18:00"),
            ("workman_id", "1"),
            ("timezone", "UTC"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_error"], false);
    let info = body["info"].as_str().unwrap();
    assert!(info.starts_with("Available time: 2020/08/05 09:00"));
    assert!(!info.contains("14:00"));
}

#[tokio::test]
#[ignore]
async fn test_slot_listing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/slots", BASE_URL))
        .query(&[("date", "2020-08-05"), ("workman_id", "1"), ("state", "available")])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let slots: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(slots.iter().all(|s| s["is_occupied"] == false));

    let response = client
        .get(format!("{}/slots", BASE_URL))
        .query(&[("workman_id", "1")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
