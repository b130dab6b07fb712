//! Inventory service — public stock reads, authenticated upserting
//! writes, and the notification cascade toward the product service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::notify::StockNotifier;
use crate::verify::{authenticate, Verifier};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub product_id: u32,
    pub stock: u64,
    pub warehouse: String,
}

/// A stock record may reference a nonexistent product — referential
/// integrity across services is not enforced.
pub fn seed_inventory() -> DashMap<u32, StockRecord> {
    let records = DashMap::new();
    for (product_id, stock, warehouse) in [
        (1, 50, "A"),
        (2, 30, "B"),
        (3, 100, "A"),
        (4, 15, "C"),
        (5, 75, "A"),
        (6, 200, "B"),
        (7, 8, "C"),
        (8, 0, "B"),
    ] {
        records.insert(product_id, StockRecord {
            product_id,
            stock,
            warehouse: warehouse.into(),
        });
    }
    records
}

pub struct InventoryState {
    pub records: DashMap<u32, StockRecord>,
    pub verifier: Arc<dyn Verifier>,
    pub notifier: StockNotifier,
}

impl InventoryState {
    pub fn new(verifier: Arc<dyn Verifier>, notifier: StockNotifier) -> Self {
        Self {
            records: seed_inventory(),
            verifier,
            notifier,
        }
    }
}

pub fn router(state: Arc<InventoryState>) -> Router {
    Router::new()
        .route("/inventory", get(list_inventory))
        .route("/inventory/:product_id", get(get_stock).put(update_stock))
        .route("/health", get(|| async { crate::health_body("inventory-service") }))
        .with_state(state)
}

async fn list_inventory(State(state): State<Arc<InventoryState>>) -> Json<Vec<StockRecord>> {
    let mut records: Vec<StockRecord> =
        state.records.iter().map(|r| r.value().clone()).collect();
    records.sort_by_key(|r| r.product_id);
    Json(records)
}

async fn get_stock(
    State(state): State<Arc<InventoryState>>,
    Path(product_id): Path<u32>,
) -> Result<Json<StockRecord>, AppError> {
    state
        .records
        .get(&product_id)
        .map(|r| Json(r.clone()))
        .ok_or_else(|| AppError::NotFound("Inventory record not found for this product".into()))
}

/// Interpret a `stock` JSON value as a non-negative integer.
///
/// Fractional or negative numbers are rejected rather than coerced.
fn parse_stock(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
        _ => None,
    }
}

async fn update_stock(
    State(state): State<Arc<InventoryState>>,
    Path(product_id): Path<u32>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    // Any authenticated principal may set any product's stock.
    authenticate(state.verifier.as_ref(), &headers).await?;

    let stock = match body.get("stock") {
        None | Some(Value::Null) => {
            return Err(AppError::Validation("Stock value is required".into()))
        }
        Some(v) => parse_stock(v)
            .ok_or_else(|| AppError::Validation("Stock must be a non-negative number".into()))?,
    };

    // Upsert: a missing record is created, not a 404.
    let record = match state.records.get_mut(&product_id) {
        Some(mut existing) => {
            let old = existing.stock;
            existing.stock = stock;
            tracing::info!(product_id, old_stock = old, new_stock = stock, "stock updated");
            existing.clone()
        }
        None => {
            let record = StockRecord {
                product_id,
                stock,
                warehouse: "A".into(),
            };
            state.records.insert(product_id, record.clone());
            tracing::info!(product_id, stock, "inventory record created");
            record
        }
    };

    // The write is complete; the cascade never gates this response.
    state.notifier.dispatch(product_id, stock);

    Ok(Json(json!({
        "message": "Inventory updated",
        "inventory": record,
    })))
}
