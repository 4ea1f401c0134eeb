//! Integration tests for the HTTP surface.
//!
//! These tests verify that:
//! - The JSON settings API round-trips the gold price through a real database
//! - Protocol errors (missing fields, wrong verbs) are rejected with the
//!   documented status codes before any store access
//! - The admin panel flow works end to end: session cookie, login, price
//!   update, and the persisted price showing up in the JSON API

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use goldeneye::admin::AdminState;
use goldeneye::config::Config;
use goldeneye::db::Database;
use goldeneye::server::app_router;
use goldeneye::session::SessionRegistry;
use goldeneye::settings::SettingsStore;

/// Build an app over a fresh temp-dir database.
async fn test_app() -> (TempDir, Router) {
    let temp = TempDir::new().unwrap();
    let config = Config::default();
    let db = Database::new(&config.database, temp.path()).await.unwrap();

    let state = Arc::new(AdminState {
        sessions: SessionRegistry::new(),
        settings: Arc::new(SettingsStore::new(db.pool())),
        auth: config.auth.clone(),
        default_price: config.price.default_price,
    });

    (temp, app_router(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Extract the `name=value` pair from a Set-Cookie header.
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_gold_price_is_null_when_unset() {
    let (_temp, app) = test_app().await;

    let response = app.oneshot(get("/api/getGoldPrice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "goldPrice": null }));
}

#[tokio::test]
async fn test_update_then_get_round_trip() {
    let (_temp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_post("/api/updategoldprice", json!({ "value": 73000.5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "success": true }));

    let response = app.oneshot(get("/api/getGoldPrice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "goldPrice": 73000.5 }));
}

#[tokio::test]
async fn test_update_setting_round_trip() {
    let (_temp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/updateSetting",
            json!({ "key": "goldPrice", "value": "81000" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/getGoldPrice")).await.unwrap();
    assert_eq!(json_body(response).await, json!({ "goldPrice": 81000.0 }));
}

#[tokio::test]
async fn test_update_setting_last_write_wins() {
    let (_temp, app) = test_app().await;

    for value in ["100", "200"] {
        let response = app
            .clone()
            .oneshot(json_post(
                "/api/updateSetting",
                json!({ "key": "goldPrice", "value": value }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/getGoldPrice")).await.unwrap();
    assert_eq!(json_body(response).await, json!({ "goldPrice": 200.0 }));
}

#[tokio::test]
async fn test_update_setting_missing_fields() {
    let (_temp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_post("/api/updateSetting", json!({ "value": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_post("/api/updateSetting", json!({ "key": "goldPrice" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_gold_price_rejects_bad_input() {
    let (_temp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_post("/api/updategoldprice", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_post("/api/updategoldprice", json!({ "value": "abc" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_verb_is_rejected() {
    let (_temp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/updategoldprice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app
        .oneshot(json_post("/api/getGoldPrice", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_panel_requires_login() {
    let (_temp, app) = test_app().await;

    let response = app.oneshot(get("/admin/panel")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/login"
    );
}

#[tokio::test]
async fn test_login_failure_keeps_login_page() {
    let (_temp, app) = test_app().await;

    let response = app
        .oneshot(form_post(
            "/admin/login",
            "username=admin&password=wrong",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text_body(response).await;
    assert!(body.contains("Login Failed"));
    assert!(body.contains("Admin Login"));
}

#[tokio::test]
async fn test_admin_flow_updates_persisted_price() {
    let (_temp, app) = test_app().await;

    // First visit creates the panel session
    let response = app.clone().oneshot(get("/admin/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    // Login unlocks the panel
    let response = app
        .clone()
        .oneshot(form_post(
            "/admin/login",
            "username=admin&password=password123",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text_body(response).await;
    assert!(body.contains("Admin Panel"));
    assert!(body.contains("Welcome, Admin!"));

    // Price update is recorded and formatted
    let response = app
        .clone()
        .oneshot(form_post(
            "/admin/panel/price",
            "new_price=81000.50",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text_body(response).await;
    assert!(body.contains("Price Updated"));
    assert!(body.contains("₹81,000.50"));

    // The durable price is visible through the JSON API
    let response = app.oneshot(get("/api/getGoldPrice")).await.unwrap();
    assert_eq!(json_body(response).await, json!({ "goldPrice": 81000.5 }));
}

#[tokio::test]
async fn test_password_reset_via_master_password() {
    let (_temp, app) = test_app().await;

    let response = app.clone().oneshot(get("/admin/forgot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(form_post(
            "/admin/forgot",
            "old_password=gold123&new_password=newpass1&confirm_new_password=newpass1",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text_body(response).await;
    assert!(body.contains("Your password has been changed."));
    assert!(body.contains("Admin Login"));

    // Old password no longer works for this session
    let response = app
        .clone()
        .oneshot(form_post(
            "/admin/login",
            "username=admin&password=password123",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert!(text_body(response).await.contains("Login Failed"));

    // The new one does
    let response = app
        .oneshot(form_post(
            "/admin/login",
            "username=admin&password=newpass1",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert!(text_body(response).await.contains("Admin Panel"));
}
