use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::github::SearchKind;

/// Settings file describing who to query and over which date range.
///
/// ```json
/// {
///   "github_token": "",
///   "members": ["octocat", "hubot"],
///   "range_start": "2024-01-01",
///   "range_end": "",
///   "exclude_labels": ["wontfix"]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default, alias = "githubToken")]
    pub github_token: Option<String>,
    pub members: Vec<String>,
    pub range_start: String,
    #[serde(default)]
    pub range_end: Option<String>,
    #[serde(default)]
    pub exclude_labels: Vec<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)?;
        let config = config.with_token_fallback(env::var("GITHUB_TOKEN").ok());
        config.validate()?;
        Ok(config)
    }

    /// Uses `env_token` when the file leaves the token out or blank.
    pub fn with_token_fallback(mut self, env_token: Option<String>) -> Self {
        let missing = self
            .github_token
            .as_deref()
            .map(|t| t.trim().is_empty())
            .unwrap_or(true);
        if missing {
            self.github_token = env_token.filter(|t| !t.trim().is_empty());
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.github_token.is_none() {
            tracing::error!("github_token not set in config and GITHUB_TOKEN environment variable not set");
            return Err(Error::Auth);
        }
        if self.members.is_empty() {
            return Err(Error::Config("members must list at least one user".to_string()));
        }
        if self.range_start.trim().is_empty() {
            return Err(Error::Config("range_start is required".to_string()));
        }
        Ok(())
    }

    pub fn token(&self) -> &str {
        self.github_token.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub organization: String,
    pub kind: SearchKind,
    pub members: Vec<String>,
    pub range_start: String,
    pub range_end: Option<String>,
    pub exclude_labels: Vec<String>,
    pub show_progress: bool,
}

impl RunConfig {
    pub fn new(config: &Config, organization: impl Into<String>, kind: SearchKind) -> Self {
        Self {
            organization: organization.into(),
            kind,
            members: config.members.clone(),
            range_start: config.range_start.clone(),
            range_end: config.range_end.clone(),
            exclude_labels: config.exclude_labels.clone(),
            show_progress: true,
        }
    }
}
