use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use encore_core::error::EncoreError;

/// Private sentinel error type used to carry an explicit HTTP 404 through
/// the `anyhow::Error` chain for routes that do not reach the core.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    pub fn join(err: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {err}"))
    }
}

fn status_for(e: &EncoreError) -> StatusCode {
    match e {
        EncoreError::CollectionNotFound(_) | EncoreError::RowNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        EncoreError::RowExists { .. } | EncoreError::AccountExists(_) => StatusCode::CONFLICT,
        EncoreError::InvalidStatus { .. } | EncoreError::InvalidSortKey(_) => {
            StatusCode::BAD_REQUEST
        }
        EncoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EncoreError::InvalidCredentials | EncoreError::Unauthorized => StatusCode::UNAUTHORIZED,
        EncoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
        EncoreError::Store(_) | EncoreError::Identity(_) => StatusCode::BAD_GATEWAY,
        EncoreError::Io(_) | EncoreError::Yaml(_) | EncoreError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let Some(e) = self.0.downcast_ref::<EncoreError>() else {
            tracing::error!("unhandled error: {:#}", self.0);
            let body = serde_json::json!({ "error": self.0.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        };

        let status = status_for(e);
        if status.is_server_error() {
            tracing::error!("{e}");
        }
        let body = match e {
            EncoreError::Validation(fields) => {
                serde_json::json!({ "error": e.to_string(), "fields": fields })
            }
            _ => serde_json::json!({ "error": e.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
