use crate::error::Result;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "encore.yaml";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "encore".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// YAML or JSON file of collections loaded into the in-memory store.
    /// Relative paths resolve against the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<PathBuf>,
}

/// Remote row-store endpoint. Only checked for plausibility here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Multiplier applied to every step duration; 0.5 runs twice as fast.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_speed() -> f64 {
    1.0
}

/// Above this a single storyteller step waits for hours.
pub const MAX_DEMO_SPEED: f64 = 10_000.0;

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
}

fn default_window_days() -> u32 {
    30
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project: ProjectConfig {
                name: project_name.into(),
            },
            ..Default::default()
        }
    }

    /// Load `encore.yaml` under `root`. A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        match crate::io::read_optional(&config_path(root))? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => {
                tracing::debug!(root = %root.display(), "no config file; using defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&config_path(root), data.as_bytes())
    }

    /// Seed path resolved against `root`, if configured.
    pub fn seed_path(&self, root: &Path) -> Option<PathBuf> {
        self.store.seed.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        })
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.project.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "project.name is empty".to_string(),
            });
        }

        if self.server.port == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "server.port must be non-zero".to_string(),
            });
        }

        if !(self.demo.speed.is_finite() && self.demo.speed > 0.0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("demo.speed must be > 0 (got {})", self.demo.speed),
            });
        } else if self.demo.speed > MAX_DEMO_SPEED {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "demo.speed {} exceeds {MAX_DEMO_SPEED}; each demo step will wait for hours",
                    self.demo.speed
                ),
            });
        }

        if self.analytics.default_window_days == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "analytics.default_window_days is 0; every issue falls outside the window"
                    .to_string(),
            });
        }

        if let Some(url) = &self.backend.url {
            if let Some(msg) = validation::validate_url(url, "backend.url") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: msg,
                });
            }
        }

        match (&self.backend.url, &self.backend.api_key) {
            (_, Some(key)) => {
                if let Some(msg) = validation::validate_api_key(key, "backend.api_key") {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: msg,
                    });
                }
            }
            (Some(_), None) => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "backend.url is set without backend.api_key".to_string(),
            }),
            (None, None) => {}
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
