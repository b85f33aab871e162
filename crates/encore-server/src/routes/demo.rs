use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use encore_core::catalog::{self, SampleIssue};
use encore_core::demo::{DemoSnapshot, DemoStep};
use encore_core::types::DemoPhase;
use serde::Serialize;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt as _;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DemoStatus {
    #[serde(flatten)]
    pub snapshot: DemoSnapshot,
    pub steps: Vec<DemoStep>,
    /// Present once the run completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<SampleIssue>,
}

fn status(app: &AppState) -> DemoStatus {
    let snapshot = app.demo.snapshot();
    let issue = (snapshot.phase == DemoPhase::Complete).then(catalog::storyteller_issue);
    DemoStatus {
        snapshot,
        steps: app.demo.steps().to_vec(),
        issue,
    }
}

/// GET /api/demo: current phase, progress and step.
pub async fn get_demo(State(app): State<AppState>) -> Json<DemoStatus> {
    Json(status(&app))
}

/// POST /api/demo/start: begin a run. Starting a sequencer that is not
/// idle leaves it untouched and reports `started: false`.
pub async fn start_demo(State(app): State<AppState>) -> Json<serde_json::Value> {
    let started = app.demo.start().is_some();
    Json(serde_json::json!({
        "started": started,
        "demo": status(&app),
    }))
}

/// POST /api/demo/reset: abort any run and return to idle.
pub async fn reset_demo(State(app): State<AppState>) -> Json<DemoStatus> {
    app.demo.reset();
    Json(status(&app))
}

/// GET /api/demo/events: SSE stream emitting a `demo` event with the full
/// snapshot on connect and after every state change.
pub async fn demo_events(State(app): State<AppState>) -> impl axum::response::IntoResponse {
    let stream = WatchStream::new(app.demo.subscribe())
        .map(|snapshot| Event::default().event("demo").json_data(snapshot));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
