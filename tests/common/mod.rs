//! Shared helpers for the integration suites: spawn services on
//! ephemeral ports and drive them with a plain reqwest client.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use minimart::auth::{self, AuthState};
use minimart::verify::{Principal, Role, Verdict, Verifier};

/// Serve a router on 127.0.0.1:0 and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A credential authority with the demo principals and a test secret.
pub async fn spawn_auth() -> String {
    let state = Arc::new(AuthState::new("integration-test-secret", 3600));
    spawn(auth::router(state)).await
}

/// A base URL nothing listens on (bound once, then released).
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub async fn login(
    client: &reqwest::Client,
    auth_url: &str,
    username: &str,
    password: &str,
) -> String {
    let resp = client
        .post(format!("{auth_url}/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "login failed for {username}");
    let body: serde_json::Value = resp.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// In-process stand-in for the remote verifier — always returns the
/// configured verdict, no network involved.
pub struct StaticVerifier(pub Verdict);

#[async_trait]
impl Verifier for StaticVerifier {
    async fn verify(&self, _token: &str) -> anyhow::Result<Verdict> {
        Ok(self.0.clone())
    }
}

/// A verifier whose authority is always unreachable.
pub struct DownVerifier;

#[async_trait]
impl Verifier for DownVerifier {
    async fn verify(&self, _token: &str) -> anyhow::Result<Verdict> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

pub fn principal(user_id: u32, username: &str, role: Role) -> Principal {
    Principal {
        user_id,
        username: username.to_string(),
        role,
    }
}
