//! Remote credential verification — the capability every resource service
//! uses to delegate token checks to the credential authority.
//!
//! The outcome is deliberately four-way so callers can tell "you sent no
//! token" (401 before any network call), "the authority rejected your
//! token" (401), and "the authority is down, try again later" (503) apart.
//! `Verifier` is a trait so tests can swap in an in-process verifier.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Roles carried inside issued credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The identity attached to a request after successful verification.
///
/// A point-in-time snapshot embedded in the credential at issue time —
/// role changes after issuance do not affect outstanding tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: u32,
    pub username: String,
    pub role: Role,
}

/// What the authority said about a presented token.
#[derive(Debug, Clone)]
pub enum Verdict {
    Allowed(Principal),
    Denied(String),
}

/// Delegated credential verification.
///
/// `Err` means the authority could not be consulted at all (transport
/// failure or a malformed response) — never that the token was bad.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: &str) -> anyhow::Result<Verdict>;
}

/// Wire shape of the authority's `GET /validate` response.
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
    user: Option<Principal>,
    error: Option<String>,
}

/// Calls the credential authority's `/validate` endpoint over HTTP.
///
/// Timeouts are bounded so an unresponsive authority degrades into a 503
/// for the caller instead of an indefinitely suspended request.
pub struct RemoteVerifier {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteVerifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build verification HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Verifier for RemoteVerifier {
    async fn verify(&self, token: &str) -> anyhow::Result<Verdict> {
        let resp = self
            .client
            .get(format!("{}/validate", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        // A non-JSON or shape-mismatched answer counts as "authority
        // unavailable", not as a rejected token.
        let body: ValidateResponse = resp.json().await?;

        if body.valid {
            let principal = body
                .user
                .ok_or_else(|| anyhow::anyhow!("validate response missing user"))?;
            Ok(Verdict::Allowed(principal))
        } else {
            Ok(Verdict::Denied(
                body.error.unwrap_or_else(|| "Invalid token".into()),
            ))
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Resolve an inbound request to an authenticated principal.
///
/// No header → 401 before any network call; authority says no → 401;
/// authority unreachable → 503.
pub async fn authenticate(
    verifier: &dyn Verifier,
    headers: &HeaderMap,
) -> Result<Principal, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthenticated)?;

    match verifier.verify(token).await {
        Ok(Verdict::Allowed(principal)) => Ok(principal),
        Ok(Verdict::Denied(reason)) => {
            tracing::debug!(reason, "token rejected by auth service");
            Err(AppError::Unauthorized("Invalid token".into()))
        }
        Err(e) => {
            tracing::error!("Auth validation failed: {e:#}");
            Err(AppError::AuthUnavailable)
        }
    }
}
