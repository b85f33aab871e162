use axum::extract::State;
use axum::Json;
use encore_core::access::AccessLevel;
use encore_core::dashboard::{AdminOverview, Loaded};

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/admin/overview: platform-wide counts. Admin only.
pub async fn get_overview(
    State(app): State<AppState>,
    caller: Caller,
) -> Result<Json<Loaded<AdminOverview>>, AppError> {
    caller.require(AccessLevel::Admin)?;
    let dashboard = app.dashboard.clone();
    let result = tokio::task::spawn_blocking(move || dashboard.overview())
        .await
        .map_err(AppError::join)?;
    Ok(Json(result))
}

/// GET /api/admin/config: the loaded `encore.yaml` with its warnings.
/// The backend API key is masked.
pub async fn get_config(
    State(app): State<AppState>,
    caller: Caller,
) -> Result<Json<serde_json::Value>, AppError> {
    caller.require(AccessLevel::Admin)?;
    let mut config = (*app.config).clone();
    if let Some(key) = config.backend.api_key.as_mut() {
        *key = "********".to_string();
    }
    Ok(Json(serde_json::json!({
        "config": config,
        "warnings": app.config.validate(),
    })))
}
