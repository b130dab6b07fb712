//! Edge router — the single public entry point.
//!
//! Maps `/api/<service>/*` prefixes to backend base URLs with a prefix
//! rewrite (strip-only for auth, strip-and-replace for the rest),
//! passes method/headers/body through unchanged, and converts backend
//! connection failures into a uniform 502. Holds no session state.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::json;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Auth,
    Profile,
    Products,
    Inventory,
}

/// Backend base URLs, injected from config.
#[derive(Debug, Clone)]
pub struct RouteTable {
    pub auth: String,
    pub profile: String,
    pub products: String,
    pub inventory: String,
}

impl RouteTable {
    pub fn base_url(&self, backend: Backend) -> &str {
        match backend {
            Backend::Auth => &self.auth,
            Backend::Profile => &self.profile,
            Backend::Products => &self.products,
            Backend::Inventory => &self.inventory,
        }
    }
}

/// Prefix → (backend, replacement). Auth is strip-only, the others
/// strip-and-replace.
const PREFIXES: &[(&str, Backend, &str)] = &[
    ("/api/auth", Backend::Auth, ""),
    ("/api/profile", Backend::Profile, "/profile"),
    ("/api/products", Backend::Products, "/products"),
    ("/api/inventory", Backend::Inventory, "/inventory"),
];

/// Rewrite an `/api/...` path to its backend-local form.
/// `None` means no prefix matched (→ 404 for the caller).
pub fn resolve(path: &str) -> Option<(Backend, String)> {
    for (prefix, backend, replacement) in PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            // "/api/authx" must not match "/api/auth".
            if !rest.is_empty() && !rest.starts_with('/') {
                continue;
            }
            let rewritten = format!("{replacement}{rest}");
            let rewritten = if rewritten.is_empty() { "/".to_string() } else { rewritten };
            return Some((*backend, rewritten));
        }
    }
    None
}

pub struct GatewayState {
    pub client: reqwest::Client,
    pub routes: RouteTable,
}

impl GatewayState {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(5))
                .build()
                .expect("failed to build proxy HTTP client"),
            routes,
        }
    }
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(any(proxy_handler))
        .with_state(state)
}

async fn health(State(state): State<Arc<GatewayState>>) -> Json<serde_json::Value> {
    Json(json!({
        "service": "api-gateway",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "routes": {
            "auth": state.routes.auth,
            "profile": state.routes.profile,
            "products": state.routes.products,
            "inventory": state.routes.inventory,
        },
    }))
}

#[tracing::instrument(skip_all, fields(req_id = %uuid::Uuid::new_v4(), method = %method, path = %uri.path()))]
async fn proxy_handler(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let path = uri.path();

    // Everything outside /api falls through to the static info response.
    if path != "/api" && !path.starts_with("/api/") {
        return Ok(info());
    }

    let Some((backend, rewritten)) = resolve(path) else {
        return Err(AppError::NotFound("API route not found".into()));
    };

    let base = state.routes.base_url(backend).to_string();
    let mut target = format!("{base}{rewritten}");
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }

    // Pass-through: same method, headers, and body. The Host header
    // belongs to this hop, not the backend.
    let mut forwarded = headers.clone();
    forwarded.remove(HOST);

    tracing::info!(url = %target, "proxying");

    let upstream = state
        .client
        .request(method, &target)
        .headers(forwarded)
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| {
            tracing::error!(url = %target, error = %e, "proxy error");
            AppError::Upstream { service: base }
        })?;

    let status = upstream.status();
    let mut resp_headers = upstream.headers().clone();
    // Length is re-derived from the buffered body.
    resp_headers.remove(TRANSFER_ENCODING);
    resp_headers.remove(CONTENT_LENGTH);

    let bytes = upstream.bytes().await.map_err(|e| {
        tracing::error!(url = %target, error = %e, "failed reading backend response");
        AppError::Upstream {
            service: state.routes.base_url(backend).to_string(),
        }
    })?;

    let mut response = Response::builder()
        .status(status)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.into()))?;
    *response.headers_mut() = resp_headers;
    Ok(response)
}

/// Static informational response for all non-API paths.
fn info() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "name": "Minimart API Gateway",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": [
                "POST /api/auth/login",
                "POST /api/auth/logout",
                "GET  /api/auth/validate",
                "GET  /api/profile/:userId",
                "PUT  /api/profile/:userId",
                "GET  /api/products",
                "GET  /api/products/:id",
                "POST /api/products",
                "GET  /api/inventory",
                "GET  /api/inventory/:productId",
                "PUT  /api/inventory/:productId",
            ],
        })),
    )
        .into_response()
}
