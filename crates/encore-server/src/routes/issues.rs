use axum::extract::{Query, State};
use axum::Json;
use encore_core::access::AccessLevel;
use encore_core::dashboard::{IssuesView, Loaded};
use encore_core::filter::{FilterCriteria, Selector};
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct IssuesQuery {
    #[serde(default)]
    pub newsletter: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl IssuesQuery {
    fn criteria(self) -> FilterCriteria {
        FilterCriteria {
            newsletter: Selector::from(self.newsletter),
            status: Selector::from(self.status),
            ..Default::default()
        }
    }
}

/// GET /api/issues?newsletter=&status=: issues newest first with their
/// newsletter attached. `all` or an omitted value leaves a selector open.
pub async fn list_issues(
    State(app): State<AppState>,
    caller: Caller,
    Query(query): Query<IssuesQuery>,
) -> Result<Json<Loaded<IssuesView>>, AppError> {
    caller.require(AccessLevel::Base)?;
    let dashboard = app.dashboard.clone();
    let criteria = query.criteria();
    let result =
        tokio::task::spawn_blocking(move || dashboard.issues(&criteria, chrono::Utc::now()))
            .await
            .map_err(AppError::join)?;
    Ok(Json(result))
}
