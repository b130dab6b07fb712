//! Product service — catalog reads are public, creation is admin-only,
//! and an unauthenticated internal endpoint receives stock notifications
//! from the inventory service (trusted internal network assumption —
//! a deliberate scope boundary, not an oversight).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::verify::{authenticate, Verifier};

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
}

/// Ordered catalog plus the next sequential id.
pub struct ProductStore {
    pub products: Vec<Product>,
    pub next_id: u32,
}

fn seed(id: u32, name: &str, description: &str, price: f64, category: &str, image: &str) -> Product {
    Product {
        id,
        name: name.into(),
        description: description.into(),
        price,
        category: category.into(),
        image: image.into(),
    }
}

pub fn seed_products() -> ProductStore {
    let products = vec![
        seed(1, "Wireless Headphones", "Noise-cancelling Bluetooth headphones", 79.99, "Electronics", "https://via.placeholder.com/200?text=Headphones"),
        seed(2, "Running Shoes", "Lightweight breathable running shoes", 129.99, "Footwear", "https://via.placeholder.com/200?text=Shoes"),
        seed(3, "Coffee Maker", "Programmable 12-cup coffee maker", 49.99, "Kitchen", "https://via.placeholder.com/200?text=Coffee"),
        seed(4, "Backpack", "Water-resistant laptop backpack", 59.99, "Accessories", "https://via.placeholder.com/200?text=Backpack"),
        seed(5, "Desk Lamp", "LED desk lamp with adjustable brightness", 34.99, "Home Office", "https://via.placeholder.com/200?text=Lamp"),
        seed(6, "Yoga Mat", "Non-slip exercise yoga mat", 24.99, "Fitness", "https://via.placeholder.com/200?text=YogaMat"),
        seed(7, "Mechanical Keyboard", "RGB mechanical gaming keyboard", 89.99, "Electronics", "https://via.placeholder.com/200?text=Keyboard"),
        seed(8, "Water Bottle", "Insulated stainless steel water bottle", 19.99, "Accessories", "https://via.placeholder.com/200?text=Bottle"),
    ];
    let next_id = products.len() as u32 + 1;
    ProductStore { products, next_id }
}

pub struct ProductState {
    pub store: RwLock<ProductStore>,
    pub verifier: Arc<dyn Verifier>,
}

impl ProductState {
    pub fn new(verifier: Arc<dyn Verifier>) -> Self {
        Self {
            store: RwLock::new(seed_products()),
            verifier,
        }
    }
}

pub fn router(state: Arc<ProductState>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", get(get_product))
        .route("/products/:id/notify", axum::routing::post(notify))
        .route("/health", get(|| async { crate::health_body("product-service") }))
        .with_state(state)
}

async fn list_products(State(state): State<Arc<ProductState>>) -> Json<Vec<Product>> {
    Json(state.store.read().await.products.clone())
}

async fn get_product(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<u32>,
) -> Result<Json<Product>, AppError> {
    let store = state.store.read().await;
    store
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}

async fn create_product(
    State(state): State<Arc<ProductState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let principal = authenticate(state.verifier.as_ref(), &headers).await?;
    if !principal.role.is_admin() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
    let price = body.get("price").and_then(Value::as_f64);
    let (name, price) = match (name, price) {
        (n, Some(p)) if !n.is_empty() => (n, p),
        _ => return Err(AppError::Validation("Name and price are required".into())),
    };

    let mut store = state.store.write().await;
    let product = Product {
        id: store.next_id,
        name: name.to_string(),
        description: body
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        price,
        category: body
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or("General")
            .to_string(),
        image: body
            .get("image")
            .and_then(Value::as_str)
            .unwrap_or("https://via.placeholder.com/200?text=Product")
            .to_string(),
    };
    store.next_id += 1;
    store.products.push(product.clone());

    tracing::info!(id = product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Internal sink for inventory stock notifications.
async fn notify(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<u32>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let store = state.store.read().await;
    let product = store
        .products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    let stock = body.get("stock").and_then(Value::as_u64);
    let message = body.get("message").and_then(Value::as_str).unwrap_or("");
    tracing::info!(product = %product.name, stock, message, "inventory notification");

    match stock {
        Some(0) => tracing::warn!(product = %product.name, "product is now OUT OF STOCK"),
        Some(s) if s <= 5 => {
            tracing::warn!(product = %product.name, stock = s, "product has LOW STOCK")
        }
        _ => {}
    }

    Ok(Json(json!({ "received": true })))
}
