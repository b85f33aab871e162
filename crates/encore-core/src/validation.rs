//! Local form validation.
//!
//! Single-field validators return `None` when the value is acceptable and a
//! human-readable message otherwise. Form validators collect those messages
//! into [`FieldErrors`]; an empty map means the form may be submitted.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_API_KEY_LEN: usize = 20;
pub const MIN_TITLE_LEN: usize = 3;
pub const MAX_TITLE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Record `message` under `field` if there is one.
    pub fn check(&mut self, field: &str, message: Option<String>) {
        if let Some(message) = message {
            self.0.insert(field.to_string(), message);
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when empty, otherwise a validation error carrying the map.
    pub fn into_result(self) -> crate::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(crate::EncoreError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap())
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

pub fn validate_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !email_re().is_match(email) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number".to_string());
    }
    None
}

/// Blank or whitespace-only values are missing.
pub fn validate_required(value: &str, field_name: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field_name} is required"));
    }
    None
}

pub fn validate_url(value: &str, field_name: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    match url::Url::parse(value) {
        Ok(_) => None,
        Err(_) => Some(format!("Please enter a valid {field_name}")),
    }
}

/// Length heuristic only; real verification happens at the provider.
pub fn validate_api_key(key: &str, field_name: &str) -> Option<String> {
    if key.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if key.chars().count() < MIN_API_KEY_LEN {
        return Some(format!("{field_name} appears to be invalid"));
    }
    None
}

pub fn validate_newsletter_title(title: &str) -> Option<String> {
    if let Some(missing) = validate_required(title, "Newsletter title") {
        return Some(missing);
    }
    let len = title.chars().count();
    if len < MIN_TITLE_LEN {
        return Some(format!(
            "Newsletter title must be at least {MIN_TITLE_LEN} characters"
        ));
    }
    if len > MAX_TITLE_LEN {
        return Some(format!(
            "Newsletter title must be less than {MAX_TITLE_LEN} characters"
        ));
    }
    None
}

pub fn validate_slug(slug: &str) -> Option<String> {
    if let Some(missing) = validate_required(slug, "Slug") {
        return Some(missing);
    }
    if !slug_re().is_match(slug) {
        return Some("Slug must be lowercase letters, numbers, and hyphens only".to_string());
    }
    None
}

/// Trim surrounding whitespace and strip angle brackets.
pub fn sanitize_input(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("email", validate_email(&self.email));
        errors.check("password", validate_password(&self.password));
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl SignUpForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("full_name", validate_required(&self.full_name, "Full name"));
        errors.check("email", validate_email(&self.email));
        errors.check("password", validate_password(&self.password));
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsletterForm {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub schedule_day: Option<String>,
    #[serde(default)]
    pub schedule_time: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl NewsletterForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_newsletter_title(&self.name));
        errors.check("slug", validate_slug(&self.slug));
        errors
    }

    /// Sanitized copy suitable for storing.
    pub fn sanitized(&self) -> NewsletterForm {
        NewsletterForm {
            name: sanitize_input(&self.name),
            slug: self.slug.trim().to_string(),
            genre: self.genre.as_deref().map(sanitize_input),
            emoji: self.emoji.clone(),
            schedule_day: self.schedule_day.as_deref().map(sanitize_input),
            schedule_time: self.schedule_time.as_deref().map(sanitize_input),
            is_active: self.is_active,
        }
    }
}

/// Connection settings an operator enters on the admin screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationForm {
    pub endpoint: String,
    pub api_key: String,
}

impl IntegrationForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("endpoint", validate_url(&self.endpoint, "Endpoint URL"));
        errors.check("api_key", validate_api_key(&self.api_key, "API Key"));
        errors
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
