//! Configuration handling for the wizard

use crate::draft::DEFAULT_NAMESPACE;
use crate::submission::{DEFAULT_SUBMISSION_URL, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the submission endpoint
pub const SUBMISSION_URL_ENV: &str = "PROJECT_WIZARD_SUBMISSION_URL";

/// Environment variable overriding the draft namespace
pub const DRAFT_NAMESPACE_ENV: &str = "PROJECT_WIZARD_DRAFT_NAMESPACE";

/// User configuration for the wizard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WizardConfig {
    /// Key the draft is stored under
    pub draft_namespace: Option<String>,
    /// Directory holding draft files
    pub draft_dir: Option<PathBuf>,
    /// Submission service endpoint
    pub submission_url: Option<String>,
    /// Submission request timeout in seconds
    pub submission_timeout_secs: Option<u64>,
}

impl WizardConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "project-wizard", "project-wizard")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user config file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SUBMISSION_URL_ENV).filter(|v| !v.is_empty()) {
            self.submission_url = Some(url);
        }
        if let Some(namespace) = lookup(DRAFT_NAMESPACE_ENV).filter(|v| !v.is_empty()) {
            self.draft_namespace = Some(namespace);
        }
    }

    pub fn draft_namespace(&self) -> &str {
        self.draft_namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Configured draft directory, else the platform data directory, else `./.project-wizard`
    pub fn draft_dir(&self) -> PathBuf {
        self.draft_dir.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("drafts"))
                .unwrap_or_else(|| PathBuf::from(".project-wizard"))
        })
    }

    pub fn submission_url(&self) -> &str {
        self.submission_url
            .as_deref()
            .unwrap_or(DEFAULT_SUBMISSION_URL)
    }

    pub fn submission_timeout(&self) -> Duration {
        self.submission_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}
