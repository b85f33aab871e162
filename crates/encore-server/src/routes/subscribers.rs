use axum::extract::{Path, State};
use axum::Json;
use encore_core::access::AccessLevel;
use encore_core::dashboard::{Loaded, SubscribersView};
use encore_core::row::Row;
use encore_core::types::SubscriberStatus;
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSubscriberBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

/// GET /api/subscribers: newest first, with status counts.
pub async fn list_subscribers(
    State(app): State<AppState>,
    caller: Caller,
) -> Result<Json<Loaded<SubscribersView>>, AppError> {
    caller.require(AccessLevel::Base)?;
    let dashboard = app.dashboard.clone();
    let result = tokio::task::spawn_blocking(move || dashboard.subscribers())
        .await
        .map_err(AppError::join)?;
    Ok(Json(result))
}

/// POST /api/subscribers: add an active subscriber.
pub async fn create_subscriber(
    State(app): State<AppState>,
    caller: Caller,
    Json(body): Json<CreateSubscriberBody>,
) -> Result<Json<Row>, AppError> {
    caller.require(AccessLevel::Base)?;
    let dashboard = app.dashboard.clone();
    let row = tokio::task::spawn_blocking(move || dashboard.create_subscriber(&body.email))
        .await
        .map_err(AppError::join)??;
    Ok(Json(row))
}

/// PATCH /api/subscribers/{id}: set `active`, `unsubscribed` or `bounced`.
pub async fn update_subscriber(
    State(app): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Row>, AppError> {
    caller.require(AccessLevel::Base)?;
    let status: SubscriberStatus = body.status.parse()?;
    let dashboard = app.dashboard.clone();
    let row =
        tokio::task::spawn_blocking(move || dashboard.update_subscriber_status(&id, status))
            .await
            .map_err(AppError::join)??;
    Ok(Json(row))
}
