//! Credential authority — issues, verifies, and revokes bearer credentials.
//!
//! Leaf service: depends on nothing else. Every other service calls back
//! to `GET /validate` here to decide authorization.

pub mod revocation;
pub mod token;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::verify::{bearer_token, Role};
use revocation::RevocationSet;
use token::TokenSigner;

/// A known principal. The password is compared in plaintext — specified
/// behavior of the source system, kept as-is (see DESIGN.md).
pub struct UserAccount {
    pub id: u32,
    pub username: &'static str,
    pub password: &'static str,
    pub role: Role,
}

/// Demo principals; immutable for the process lifetime (no create/delete
/// endpoint in scope).
pub fn seed_users() -> Vec<UserAccount> {
    vec![
        UserAccount { id: 1, username: "alice", password: "password123", role: Role::Admin },
        UserAccount { id: 2, username: "bob", password: "password456", role: Role::User },
        UserAccount { id: 3, username: "charlie", password: "password789", role: Role::User },
    ]
}

pub struct AuthState {
    pub users: Vec<UserAccount>,
    pub signer: TokenSigner,
    pub revoked: RevocationSet,
}

impl AuthState {
    pub fn new(jwt_secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            users: seed_users(),
            signer: TokenSigner::new(jwt_secret, token_ttl_secs),
            revoked: RevocationSet::new(),
        }
    }
}

pub fn router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/validate", get(validate))
        .route("/health", get(|| async { crate::health_body("auth-service") }))
        .with_state(state)
}

async fn login(
    State(state): State<Arc<AuthState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    let (username, password) = match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Err(AppError::Validation(
                "Username and password are required".into(),
            ))
        }
    };

    let user = state
        .users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    let token = state.signer.issue(user.id, user.username, user.role)?;

    tracing::info!(username, "user logged in");
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": { "id": user.id, "username": user.username, "role": user.role },
    })))
}

async fn logout(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token =
        bearer_token(&headers).ok_or_else(|| AppError::Validation("No token provided".into()))?;

    state.revoked.revoke(token);
    tracing::info!("token revoked (user logged out)");
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// `GET /validate` — the verification operation other services delegate to.
///
/// The response shape is its own contract (`{valid, user}` /
/// `{valid:false, error}`), so failures are built here rather than via
/// `AppError`. The revocation check runs before any decoding so a
/// revoked-but-still-cryptographically-valid token is always rejected.
async fn validate(State(state): State<Arc<AuthState>>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return invalid("No token provided");
    };

    if state.revoked.contains(token) {
        return invalid("Token has been revoked");
    }

    match state.signer.decode(token) {
        Ok(claims) => Json(json!({ "valid": true, "user": claims })).into_response(),
        Err(_) => invalid("Invalid or expired token"),
    }
}

fn invalid(reason: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "valid": false, "error": reason })),
    )
        .into_response()
}
