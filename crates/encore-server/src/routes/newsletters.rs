use axum::extract::{Path, State};
use axum::Json;
use encore_core::access::AccessLevel;
use encore_core::dashboard::{AutomationView, Loaded};
use encore_core::row::Row;
use encore_core::validation::NewsletterForm;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/newsletters: every newsletter, ordered by name.
pub async fn list_newsletters(
    State(app): State<AppState>,
    caller: Caller,
) -> Result<Json<Loaded<Vec<Row>>>, AppError> {
    caller.require(AccessLevel::Base)?;
    let dashboard = app.dashboard.clone();
    let result = tokio::task::spawn_blocking(move || dashboard.newsletters())
        .await
        .map_err(AppError::join)?;
    Ok(Json(result))
}

/// POST /api/newsletters: validate and create a newsletter.
pub async fn create_newsletter(
    State(app): State<AppState>,
    caller: Caller,
    Json(form): Json<NewsletterForm>,
) -> Result<Json<Row>, AppError> {
    caller.require(AccessLevel::Base)?;
    let dashboard = app.dashboard.clone();
    let row = tokio::task::spawn_blocking(move || dashboard.create_newsletter(&form))
        .await
        .map_err(AppError::join)??;
    Ok(Json(row))
}

/// PATCH /api/newsletters/{id}: merge the given fields into a newsletter.
pub async fn update_newsletter(
    State(app): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(changes): Json<Row>,
) -> Result<Json<Row>, AppError> {
    caller.require(AccessLevel::Base)?;
    let dashboard = app.dashboard.clone();
    let row = tokio::task::spawn_blocking(move || dashboard.update_newsletter(&id, &changes))
        .await
        .map_err(AppError::join)??;
    Ok(Json(row))
}

/// DELETE /api/newsletters/{id}
pub async fn delete_newsletter(
    State(app): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    caller.require(AccessLevel::Base)?;
    let dashboard = app.dashboard.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || dashboard.delete_newsletter(&id))
        .await
        .map_err(AppError::join)??;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// GET /api/automation: newsletters with their automation flag and the
/// number currently switched on.
pub async fn get_automation(
    State(app): State<AppState>,
    caller: Caller,
) -> Result<Json<Loaded<AutomationView>>, AppError> {
    caller.require(AccessLevel::Enterprise)?;
    let dashboard = app.dashboard.clone();
    let result = tokio::task::spawn_blocking(move || dashboard.automation())
        .await
        .map_err(AppError::join)?;
    Ok(Json(result))
}

/// POST /api/automation/{id}/toggle
pub async fn toggle_automation(
    State(app): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Row>, AppError> {
    caller.require(AccessLevel::Enterprise)?;
    let dashboard = app.dashboard.clone();
    let row = tokio::task::spawn_blocking(move || dashboard.toggle_automation(&id))
        .await
        .map_err(AppError::join)??;
    Ok(Json(row))
}
