use axum::extract::State;
use axum::Json;
use encore_core::access::AccessLevel;
use encore_core::identity::Session;
use encore_core::session::{AuthState, SessionContext};
use encore_core::validation::{SignInForm, SignUpForm};
use serde::Serialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionBody {
    pub token: Option<String>,
    pub level: AccessLevel,
    #[serde(flatten)]
    pub state: AuthState,
}

fn context(app: &AppState) -> SessionContext {
    SessionContext::new(app.identity.clone(), app.store.clone())
}

fn body(ctx: &SessionContext) -> SessionBody {
    SessionBody {
        token: ctx.token(),
        level: ctx.level(),
        state: ctx.state(),
    }
}

/// POST /api/auth/signup: create an account and open a session.
pub async fn sign_up(
    State(app): State<AppState>,
    Json(form): Json<SignUpForm>,
) -> Result<Json<SessionBody>, AppError> {
    let ctx = context(&app);
    let result = tokio::task::spawn_blocking(move || {
        let session: Session = ctx.sign_up(&form)?;
        tracing::info!(user = %session.user.id, "sign up");
        Ok::<_, encore_core::EncoreError>(body(&ctx))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// POST /api/auth/signin: exchange credentials for a session token.
pub async fn sign_in(
    State(app): State<AppState>,
    Json(form): Json<SignInForm>,
) -> Result<Json<SessionBody>, AppError> {
    let ctx = context(&app);
    let result = tokio::task::spawn_blocking(move || {
        ctx.sign_in(&form)?;
        Ok::<_, encore_core::EncoreError>(body(&ctx))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// POST /api/auth/signout: end the caller's session. Anonymous callers are
/// a no-op.
pub async fn sign_out(
    State(app): State<AppState>,
    caller: Caller,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(token) = caller.token {
        let ctx = context(&app);
        tokio::task::spawn_blocking(move || {
            ctx.restore(&token)?;
            ctx.sign_out()
        })
        .await
        .map_err(AppError::join)??;
    }
    Ok(Json(serde_json::json!({ "signed_out": true })))
}

/// GET /api/auth/session: who the bearer token belongs to, with their
/// profile, active subscription and access level.
pub async fn get_session(
    State(app): State<AppState>,
    caller: Caller,
) -> Result<Json<SessionBody>, AppError> {
    let ctx = context(&app);
    let result = tokio::task::spawn_blocking(move || {
        if let Some(token) = &caller.token {
            ctx.restore(token)?;
        }
        Ok::<_, encore_core::EncoreError>(body(&ctx))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
