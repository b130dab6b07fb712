//! Profile service — user profile records, writes gated by ownership.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::verify::{authenticate, Verifier};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: u32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub avatar: String,
}

pub fn seed_profiles() -> DashMap<u32, Profile> {
    let profiles = DashMap::new();
    profiles.insert(1, Profile {
        user_id: 1,
        username: "alice".into(),
        email: "alice@example.com".into(),
        full_name: "Alice Johnson".into(),
        bio: "Platform administrator".into(),
        avatar: "https://i.pravatar.cc/150?u=alice".into(),
    });
    profiles.insert(2, Profile {
        user_id: 2,
        username: "bob".into(),
        email: "bob@example.com".into(),
        full_name: "Bob Smith".into(),
        bio: "Regular shopper".into(),
        avatar: "https://i.pravatar.cc/150?u=bob".into(),
    });
    profiles.insert(3, Profile {
        user_id: 3,
        username: "charlie".into(),
        email: "charlie@example.com".into(),
        full_name: "Charlie Brown".into(),
        bio: "New customer".into(),
        avatar: "https://i.pravatar.cc/150?u=charlie".into(),
    });
    profiles
}

pub struct ProfileState {
    pub profiles: DashMap<u32, Profile>,
    pub verifier: Arc<dyn Verifier>,
}

impl ProfileState {
    pub fn new(verifier: Arc<dyn Verifier>) -> Self {
        Self {
            profiles: seed_profiles(),
            verifier,
        }
    }
}

pub fn router(state: Arc<ProfileState>) -> Router {
    Router::new()
        .route("/profile/:user_id", get(get_profile).put(update_profile))
        .route("/health", get(|| async { crate::health_body("profile-service") }))
        .with_state(state)
}

async fn get_profile(
    State(state): State<Arc<ProfileState>>,
    Path(user_id): Path<u32>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    authenticate(state.verifier.as_ref(), &headers).await?;

    let profile = state
        .profiles
        .get(&user_id)
        .map(|p| p.clone())
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;

    Ok(Json(profile))
}

/// Optional fields of a profile update. Anything else in the body is
/// ignored; wrong types are rejected with a 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfile {
    email: Option<String>,
    full_name: Option<String>,
    bio: Option<String>,
}

async fn update_profile(
    State(state): State<Arc<ProfileState>>,
    Path(user_id): Path<u32>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let principal = authenticate(state.verifier.as_ref(), &headers).await?;

    // Users can only update their own profile (unless admin).
    if principal.user_id != user_id && !principal.role.is_admin() {
        return Err(AppError::Forbidden(
            "You can only update your own profile".into(),
        ));
    }

    let update: UpdateProfile = serde_json::from_value(body)
        .map_err(|_| AppError::Validation("Invalid request body".into()))?;

    let mut entry = state
        .profiles
        .get_mut(&user_id)
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;

    if let Some(email) = update.email.filter(|s| !s.is_empty()) {
        entry.email = email;
    }
    if let Some(full_name) = update.full_name.filter(|s| !s.is_empty()) {
        entry.full_name = full_name;
    }
    if let Some(bio) = update.bio.filter(|s| !s.is_empty()) {
        entry.bio = bio;
    }

    tracing::info!(user_id, "profile updated");
    Ok(Json(json!({
        "message": "Profile updated",
        "profile": entry.clone(),
    })))
}
