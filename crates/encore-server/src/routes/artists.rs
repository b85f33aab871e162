use axum::extract::{Query, State};
use axum::Json;
use encore_core::access::AccessLevel;
use encore_core::dashboard::{ArtistsView, Loaded};
use encore_core::filter::{FilterCriteria, Selector};
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ArtistsQuery {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// `confidence`, `growth`, `listeners` or `recent`. Unknown keys keep
    /// the stored order.
    #[serde(default)]
    pub sort: Option<String>,
}

/// GET /api/artists?genre=&status=&sort=: the discovery roster. Premium
/// and above.
pub async fn list_artists(
    State(app): State<AppState>,
    caller: Caller,
    Query(query): Query<ArtistsQuery>,
) -> Result<Json<Loaded<ArtistsView>>, AppError> {
    caller.require(AccessLevel::Premium)?;
    let criteria = FilterCriteria {
        genre: Selector::from(query.genre),
        status: Selector::from(query.status),
        sort: query.sort,
        ..Default::default()
    };
    let dashboard = app.dashboard.clone();
    let result =
        tokio::task::spawn_blocking(move || dashboard.artists(&criteria, chrono::Utc::now()))
            .await
            .map_err(AppError::join)?;
    Ok(Json(result))
}
