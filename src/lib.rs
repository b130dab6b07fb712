//! Minimart — a mini e-commerce constellation of HTTP services.
//!
//! One crate, five services: the credential authority (`auth`), three
//! resource services (`services`), and the edge router (`gateway`).
//! Each service is an independent `axum::Router` over its own injected
//! state, so tests can compose them on ephemeral ports without any
//! shared process-global storage.

pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod notify;
pub mod services;
pub mod verify;

use axum::Json;
use serde_json::{json, Value};

/// Health payload shared by every service: `{service, status, timestamp}`.
pub fn health_body(service: &'static str) -> Json<Value> {
    Json(json!({
        "service": service,
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
