use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "dhaba-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
