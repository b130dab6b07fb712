use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Error taxonomy shared by all services.
///
/// Every variant maps to a JSON body with at least an `error` field;
/// internal detail never leaks to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("authorization header required")]
    Unauthenticated,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("auth service unavailable")]
    AuthUnavailable,

    #[error("upstream unavailable: {service}")]
    Upstream { service: String },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authorization header required".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::AuthUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Auth service unavailable".to_string(),
            ),
            AppError::Upstream { service } => {
                // Distinct body shape: clients get the backend that was down.
                let body = Json(json!({
                    "error": "Service unavailable",
                    "service": service,
                }));
                return (StatusCode::BAD_GATEWAY, body).into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let resp = AppError::Validation("Stock value is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let resp = AppError::Unauthenticated.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn auth_unavailable_maps_to_503() {
        let resp = AppError::AuthUnavailable.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_maps_to_502() {
        let resp = AppError::Upstream {
            service: "http://localhost:3003".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
