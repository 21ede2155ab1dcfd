use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy shared by the repositories and the HTTP boundary.
///
/// Repositories signal absence with `Ok(None)` / `Ok(false)`; they return an
/// `AppError` only for genuinely exceptional outcomes (duplicate email,
/// hashing failure, store failure). The `IntoResponse` impl below is the one
/// place where outcomes become HTTP status codes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    /// Route-level miss: unknown path, unsupported method, or an item path
    /// whose id segment is not a plain decimal integer. Unlike every other
    /// variant this renders as a bare text body, not a JSON object.
    #[error("Not Found")]
    RouteNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Auth(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn route_not_found() -> Self {
        AppError::RouteNotFound
    }
}

/// Fallback handler wired onto the router and onto every method router, so
/// an unknown path and an unsupported method on a known path produce the
/// same response.
pub async fn not_found() -> AppError {
    AppError::route_not_found()
}

/// Malformed or undecodable JSON bodies are client errors, not server faults.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::RouteNotFound => {
                return (StatusCode::NOT_FOUND, "Not Found").into_response();
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.to_string()),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            AppError::Database(ref e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn not_found_renders_entity_message() {
        let response = AppError::NotFound("Expense not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Expense not found" })
        );
    }

    #[tokio::test]
    async fn database_errors_stay_generic() {
        let response = AppError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        let response = AppError::Conflict("Email already registered").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn route_misses_render_as_bare_text() {
        let response = AppError::route_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert_eq!(&bytes[..], b"Not Found");
    }
}
