use axum::extract::{Query, State};
use axum::Json;
use encore_core::access::AccessLevel;
use encore_core::dashboard::{AnalyticsView, Loaded};
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Defaults to `analytics.default_window_days`.
    #[serde(default)]
    pub days: Option<u32>,
}

/// GET /api/analytics?days=: engagement totals over sent issues in the
/// window. Premium and above.
pub async fn get_analytics(
    State(app): State<AppState>,
    caller: Caller,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Loaded<AnalyticsView>>, AppError> {
    caller.require(AccessLevel::Premium)?;
    let days = query
        .days
        .unwrap_or(app.config.analytics.default_window_days);
    let dashboard = app.dashboard.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut view = dashboard.analytics(days, chrono::Utc::now());
        view.data.metrics = view.data.metrics.rounded();
        view
    })
    .await
    .map_err(AppError::join)?;
    Ok(Json(result))
}
