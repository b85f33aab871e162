use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use encore_core::access::{self, AccessLevel, GateDecision};
use encore_core::error::EncoreError;
use encore_core::identity::{Profile, Session};
use encore_core::session;

use crate::error::AppError;
use crate::state::AppState;

/// The requester as identified by an `Authorization: Bearer <token>` header.
///
/// A missing, malformed or expired token yields an anonymous caller rather
/// than a rejection; handlers decide via [`Caller::require`].
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub token: Option<String>,
    pub session: Option<Session>,
    pub profile: Option<Profile>,
}

impl Caller {
    pub fn role(&self) -> Option<&str> {
        match (&self.session, &self.profile) {
            (None, _) => None,
            (Some(_), Some(p)) => Some(p.role.as_str()),
            (Some(_), None) => Some(encore_core::identity::DEFAULT_ROLE),
        }
    }

    pub fn level(&self) -> AccessLevel {
        access::level(self.role())
    }

    /// The caller's session when their level meets `required`.
    pub fn require(&self, required: AccessLevel) -> Result<&Session, AppError> {
        match access::gate(self.role(), required) {
            GateDecision::Allowed => self
                .session
                .as_ref()
                .ok_or_else(|| AppError(EncoreError::Unauthorized.into())),
            GateDecision::SignInRequired => Err(AppError(EncoreError::Unauthorized.into())),
            GateDecision::UpgradeRequired { required } => {
                tracing::debug!(
                    level = %self.level().as_str(),
                    required = %required.as_str(),
                    "access denied"
                );
                Err(AppError(
                    EncoreError::Forbidden {
                        required: required.plan_name().to_string(),
                    }
                    .into(),
                ))
            }
        }
    }
}

fn bearer(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, AppError> {
        let Some(token) = bearer(parts) else {
            return Ok(Caller::default());
        };
        let identity = app.identity.clone();
        let store = app.store.clone();
        tokio::task::spawn_blocking(move || {
            let Some(session) = identity.current_session(&token)? else {
                return Ok(Caller::default());
            };
            let profile = session::load_profile(store.as_ref(), &session.user.id)?;
            Ok::<_, EncoreError>(Caller {
                token: Some(token),
                session: Some(session),
                profile,
            })
        })
        .await
        .map_err(AppError::join)?
        .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use axum::response::IntoResponse;

    fn caller(role: Option<&str>) -> Caller {
        let session = Session {
            token: "t".into(),
            user: encore_core::identity::User {
                id: "u1".into(),
                email: "u@x.io".into(),
            },
            created_at: chrono::Utc::now(),
        };
        Caller {
            token: Some("t".into()),
            session: Some(session),
            profile: role.map(|r| Profile {
                id: "u1".into(),
                email: None,
                full_name: None,
                role: r.into(),
            }),
        }
    }

    #[test]
    fn bearer_header_parsing() {
        let (parts, _) = Request::builder()
            .header("authorization", "Bearer abc123")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer(&parts).as_deref(), Some("abc123"));

        let (parts, _) = Request::builder()
            .header("authorization", "Basic abc123")
            .body(())
            .unwrap()
            .into_parts();
        assert!(bearer(&parts).is_none());
    }

    #[test]
    fn anonymous_needs_sign_in() {
        let err = Caller::default().require(AccessLevel::Base).unwrap_err();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn missing_profile_counts_as_subscriber() {
        let c = caller(None);
        assert_eq!(c.level(), AccessLevel::Base);
        assert!(c.require(AccessLevel::Base).is_ok());
        assert!(c.require(AccessLevel::Premium).is_err());
    }

    #[test]
    fn premium_blocked_from_enterprise() {
        let c = caller(Some("premium"));
        assert!(c.require(AccessLevel::Premium).is_ok());
        let err = c.require(AccessLevel::Enterprise).unwrap_err();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::FORBIDDEN
        );
    }
}
