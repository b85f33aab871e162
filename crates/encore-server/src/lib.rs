pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, patch, post};
use axum::Router;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth
        .route("/api/auth/signup", post(routes::auth::sign_up))
        .route("/api/auth/signin", post(routes::auth::sign_in))
        .route("/api/auth/signout", post(routes::auth::sign_out))
        .route("/api/auth/session", get(routes::auth::get_session))
        // Catalog
        .route("/api/genres", get(routes::catalog::list_genres))
        .route("/api/genres/{id}", get(routes::catalog::get_genre))
        .route("/api/dashboard", get(routes::catalog::get_dashboard))
        // Newsletters
        .route(
            "/api/newsletters",
            get(routes::newsletters::list_newsletters).post(routes::newsletters::create_newsletter),
        )
        .route(
            "/api/newsletters/{id}",
            patch(routes::newsletters::update_newsletter)
                .delete(routes::newsletters::delete_newsletter),
        )
        // Automation
        .route("/api/automation", get(routes::newsletters::get_automation))
        .route(
            "/api/automation/{id}/toggle",
            post(routes::newsletters::toggle_automation),
        )
        // Issues
        .route("/api/issues", get(routes::issues::list_issues))
        // Subscribers
        .route(
            "/api/subscribers",
            get(routes::subscribers::list_subscribers)
                .post(routes::subscribers::create_subscriber),
        )
        .route(
            "/api/subscribers/{id}",
            patch(routes::subscribers::update_subscriber),
        )
        // Analytics / Artists
        .route("/api/analytics", get(routes::analytics::get_analytics))
        .route("/api/artists", get(routes::artists::list_artists))
        // Admin
        .route("/api/admin/overview", get(routes::admin::get_overview))
        .route("/api/admin/config", get(routes::admin::get_config))
        // Demo
        .route("/api/demo", get(routes::demo::get_demo))
        .route("/api/demo/start", post(routes::demo::start_demo))
        .route("/api/demo/reset", post(routes::demo::reset_demo))
        .route("/api/demo/events", get(routes::demo::demo_events))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the encore API server for the project at `root`.
pub async fn serve(root: &Path, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let app_state = AppState::load(root)?;
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener, open_browser).await
}

/// Start the server on a pre-bound listener so the caller can read the
/// actual port first (useful with port 0).
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(
        project = %app_state.config.project.name,
        "encore server listening on http://localhost:{actual_port}"
    );

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/dashboard");
        if let Err(e) = open::that(&url) {
            tracing::warn!("could not open browser: {e}");
        }
    }

    axum::serve(listener, build_router(app_state)).await?;
    Ok(())
}
