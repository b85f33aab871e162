use axum::extract::Path;
use axum::Json;
use encore_core::catalog::{self, DashboardStats, Genre, GENRES};

use crate::error::AppError;

/// GET /api/genres: the fixed newsletter lineup.
pub async fn list_genres() -> Json<&'static [Genre]> {
    Json(&GENRES[..])
}

/// GET /api/genres/{id}
pub async fn get_genre(Path(id): Path<String>) -> Result<Json<&'static Genre>, AppError> {
    catalog::genre(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("unknown genre '{id}'")))
}

/// GET /api/dashboard: headline totals across the lineup.
pub async fn get_dashboard() -> Json<DashboardStats> {
    Json(catalog::dashboard_stats(&GENRES))
}
