//! Identity service interface and an in-memory provider.

use crate::error::{EncoreError, Result};
use crate::row::Row;
use crate::store::{RowStore, PROFILES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Role every new account starts with.
pub const DEFAULT_ROLE: &str = "subscriber";

// ---------------------------------------------------------------------------
// User / Session / Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

impl Profile {
    pub fn from_row(row: &Row) -> Option<Profile> {
        serde_json::from_value(row.clone().into_value()).ok()
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new().with("id", self.id.clone()).with("role", self.role.clone());
        if let Some(email) = &self.email {
            row.set("email", email.clone());
        }
        if let Some(name) = &self.full_name {
            row.set("full_name", name.clone());
        }
        row
    }
}

// ---------------------------------------------------------------------------
// IdentityService
// ---------------------------------------------------------------------------

pub trait IdentityService: Send + Sync {
    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Session>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    fn sign_out(&self, token: &str) -> Result<()>;

    /// The live session for `token`, or `None` when it has ended.
    fn current_session(&self, token: &str) -> Result<Option<Session>>;
}

// ---------------------------------------------------------------------------
// MemoryIdentity
// ---------------------------------------------------------------------------

struct Account {
    user: User,
    salt: String,
    password_hash: String,
}

/// Accounts and sessions held in process. New sign-ups also get a
/// `user_profiles` row in the backing store with the default role.
pub struct MemoryIdentity {
    store: Arc<dyn RowStore>,
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryIdentity {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn open_session(&self, user: User) -> Result<Session> {
        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .map_err(|_| poisoned())?
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }
}

fn poisoned() -> EncoreError {
    EncoreError::Identity("identity lock poisoned".to_string())
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityService for MemoryIdentity {
    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Session> {
        let email = normalize_email(email);
        let user = {
            let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
            if accounts.contains_key(&email) {
                return Err(EncoreError::AccountExists(email));
            }
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.clone(),
            };
            let profile = Profile {
                id: user.id.clone(),
                email: Some(email.clone()),
                full_name: Some(display_name.trim().to_string()),
                role: default_role(),
            };
            // The account only exists once its profile row does.
            self.store.insert(PROFILES, profile.to_row())?;

            let salt = uuid::Uuid::new_v4().simple().to_string();
            let password_hash = hash_password(&salt, password);
            accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    salt,
                    password_hash,
                },
            );
            user
        };
        tracing::info!(user = %user.id, "account created");
        self.open_session(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email);
        let user = {
            let accounts = self.accounts.read().map_err(|_| poisoned())?;
            let account = accounts.get(&email).ok_or(EncoreError::InvalidCredentials)?;
            if hash_password(&account.salt, password) != account.password_hash {
                return Err(EncoreError::InvalidCredentials);
            }
            account.user.clone()
        };
        tracing::debug!(user = %user.id, "signed in");
        self.open_session(user)
    }

    fn sign_out(&self, token: &str) -> Result<()> {
        self.sessions.write().map_err(|_| poisoned())?.remove(token);
        Ok(())
    }

    fn current_session(&self, token: &str) -> Result<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .map_err(|_| poisoned())?
            .get(token)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
