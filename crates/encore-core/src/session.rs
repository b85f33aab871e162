//! Explicit session context.
//!
//! Holds the signed-in user, their profile and active subscription, and
//! publishes every change through a watch channel. Callers pass the context
//! to whatever needs it instead of reaching for ambient state.

use crate::access::{self, AccessLevel, GateDecision};
use crate::error::Result;
use crate::identity::{IdentityService, Profile, Session, User};
use crate::row::Row;
use crate::store::{Query, RowStore, PROFILES, SUBSCRIPTIONS};
use crate::validation::{SignInForm, SignUpForm};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub profile: Option<Profile>,
    pub subscription: Option<Row>,
}

impl AuthState {
    pub fn role(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.role.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Profile row for `user_id`, if one exists.
pub fn load_profile(store: &dyn RowStore, user_id: &str) -> Result<Option<Profile>> {
    let row = store.find_one(&Query::from(PROFILES).eq("id", user_id))?;
    Ok(row.as_ref().and_then(Profile::from_row))
}

/// The user's active subscription row, if any.
pub fn load_subscription(store: &dyn RowStore, user_id: &str) -> Result<Option<Row>> {
    store.find_one(
        &Query::from(SUBSCRIPTIONS)
            .eq("user_id", user_id)
            .eq("status", "active"),
    )
}

pub struct SessionContext {
    identity: Arc<dyn IdentityService>,
    store: Arc<dyn RowStore>,
    token: Mutex<Option<String>>,
    state: watch::Sender<AuthState>,
}

impl SessionContext {
    pub fn new(identity: Arc<dyn IdentityService>, store: Arc<dyn RowStore>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            identity,
            store,
            token: Mutex::new(None),
            state,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every sign-in, sign-out and profile reload.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    /// Resume a previously issued session token. An expired token clears the
    /// context and returns `false`.
    pub fn restore(&self, token: &str) -> Result<bool> {
        match self.identity.current_session(token)? {
            Some(session) => {
                self.enter(session);
                Ok(true)
            }
            None => {
                self.clear();
                Ok(false)
            }
        }
    }

    /// Validate locally, then create the account and sign in.
    pub fn sign_up(&self, form: &SignUpForm) -> Result<Session> {
        form.validate().into_result()?;
        let session = self
            .identity
            .sign_up(&form.email, &form.password, &form.full_name)?;
        self.enter(session.clone());
        Ok(session)
    }

    pub fn sign_in(&self, form: &SignInForm) -> Result<Session> {
        form.validate().into_result()?;
        let session = self.identity.sign_in(&form.email, &form.password)?;
        self.enter(session.clone());
        Ok(session)
    }

    pub fn sign_out(&self) -> Result<()> {
        if let Some(token) = self.token() {
            self.identity.sign_out(&token)?;
        }
        self.clear();
        Ok(())
    }

    /// Re-read profile and subscription, e.g. after an upgrade.
    pub fn reload(&self) {
        let user = self.state.borrow().user.clone();
        if let Some(user) = user {
            self.load_user_data(user);
        }
    }

    pub fn level(&self) -> AccessLevel {
        access::level(self.state.borrow().role())
    }

    /// Signed out always fails, whatever the requirement.
    pub fn has_access(&self, required_role: &str) -> bool {
        match self.state.borrow().role() {
            Some(role) => access::has_access(role, required_role),
            None => false,
        }
    }

    pub fn gate(&self, required: AccessLevel) -> GateDecision {
        let state = self.state.borrow();
        if state.user.is_none() {
            return GateDecision::SignInRequired;
        }
        // A signed-in user whose profile has not loaded is treated as base.
        access::gate(Some(state.role().unwrap_or(crate::identity::DEFAULT_ROLE)), required)
    }

    fn enter(&self, session: Session) {
        if let Ok(mut token) = self.token.lock() {
            *token = Some(session.token.clone());
        }
        self.load_user_data(session.user);
    }

    fn load_user_data(&self, user: User) {
        let profile = load_profile(self.store.as_ref(), &user.id).unwrap_or_else(|e| {
            tracing::warn!(user = %user.id, "failed to load profile: {e}");
            None
        });
        let subscription =
            load_subscription(self.store.as_ref(), &user.id).unwrap_or_else(|e| {
                tracing::warn!(user = %user.id, "failed to load subscription: {e}");
                None
            });
        self.state.send_replace(AuthState {
            user: Some(user),
            profile,
            subscription,
        });
    }

    fn clear(&self) {
        if let Ok(mut token) = self.token.lock() {
            *token = None;
        }
        self.state.send_replace(AuthState::default());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
