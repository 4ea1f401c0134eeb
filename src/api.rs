//! JSON settings API.
//!
//! Mirrors the legacy endpoints consumed by external pages:
//! `GET /api/getGoldPrice`, `POST /api/updateSetting`,
//! `POST /api/updategoldprice`.
//!
//! There is no authentication at this boundary: any caller may write the
//! price. Admin gating exists only in the panel UI. Wrong-verb requests are
//! rejected by the router (405) before any store access.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::settings::SettingsStore;

/// Build the JSON API router.
pub fn api_router(store: Arc<SettingsStore>) -> Router {
    Router::new()
        .route("/api/getGoldPrice", get(get_gold_price))
        .route("/api/updateSetting", post(update_setting))
        .route("/api/updategoldprice", post(update_gold_price))
        .with_state(store)
}

/// `GET /api/getGoldPrice`: the stored price as a number, or null if unset.
async fn get_gold_price(
    State(store): State<Arc<SettingsStore>>,
) -> (StatusCode, Json<Value>) {
    match store.gold_price().await {
        Ok(price) => (StatusCode::OK, Json(json!({ "goldPrice": price }))),
        Err(e) => {
            error!("Failed to load gold price: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to load gold price" })),
            )
        }
    }
}

/// `POST /api/updateSetting`: generic upsert of `{key, value}`.
async fn update_setting(
    State(store): State<Arc<SettingsStore>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = match body.get("key").and_then(Value::as_str) {
        Some(key) if !key.is_empty() => key,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing key or value" })),
            );
        }
    };
    let Some(value) = body.get("value") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing key or value" })),
        );
    };

    let value_text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match store.upsert(key, &value_text).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(e) => {
            error!(key, "Failed to upsert setting: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to store setting" })),
            )
        }
    }
}

/// `POST /api/updategoldprice`: upsert of `{value}` onto the gold price key.
async fn update_gold_price(
    State(store): State<Arc<SettingsStore>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(value) = body.get("value") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Gold price is required" })),
        );
    };

    let price = match coerce_price(value) {
        Some(price) => price,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Gold price must be a number" })),
            );
        }
    };

    match store.set_gold_price(price).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(e) => {
            error!("Failed to store gold price: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to store gold price" })),
            )
        }
    }
}

/// Accept a JSON number or a numeric string as a price.
fn coerce_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
