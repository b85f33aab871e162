use crate::validation::FieldErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncoreError {
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("row not found: {collection}/{id}")]
    RowNotFound { collection: String, id: String },

    #[error("row already exists: {collection}/{id}")]
    RowExists { collection: String, id: String },

    #[error("account already exists: {0}")]
    AccountExists(String),

    #[error("invalid status '{value}' for {kind}")]
    InvalidStatus { kind: &'static str, value: String },

    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("sign in required")]
    Unauthorized,

    #[error("this feature requires a {required} subscription")]
    Forbidden { required: String },

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("row store error: {0}")]
    Store(String),

    #[error("identity service error: {0}")]
    Identity(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EncoreError>;
