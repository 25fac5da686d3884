//! Runtime configuration for `gstn`.
//!
//! Loaded from an optional TOML file, then overridden from the environment.
//!
//! # Example
//!
//! ```toml
//! [remote]
//! url = "https://status.example.com/api/filing-status"
//! timeout_seconds = 30
//!
//! [fetch]
//! workers = 10
//! wait_seconds = 60
//!
//! [serve]
//! port = 8080
//! export_dir = "/var/tmp/gstn"
//! ```
//!
//! Environment overrides: `GSTN_API_URL`, `GSTN_FETCH_WORKERS`,
//! `GSTN_EXPORT_DIR`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gstn_fetch::{FetchOptions, DEFAULT_WAIT, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};

pub const ENV_API_URL: &str = "GSTN_API_URL";
pub const ENV_FETCH_WORKERS: &str = "GSTN_FETCH_WORKERS";
pub const ENV_EXPORT_DIR: &str = "GSTN_EXPORT_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("no remote service URL configured (set [remote] url or {ENV_API_URL})")]
    MissingUrl,
}

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteSettings,
    pub fetch: FetchSettings,
    pub serve: ServeSettings,
}

/// `[remote]` -- the filing-status service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Required once a lookup is about to run.
    pub url: Option<String>,
    /// Per-call transport timeout.
    pub timeout_seconds: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            url: None,
            timeout_seconds: 30,
        }
    }
}

/// `[fetch]` -- the lookup worker pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub workers: usize,
    pub wait_seconds: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            workers: DEFAULT_WORKERS,
            wait_seconds: DEFAULT_WAIT.as_secs(),
        }
    }
}

/// `[serve]` -- the HTTP service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeSettings {
    pub port: u16,
    /// Where report files are written until downloaded.
    pub export_dir: PathBuf,
}

impl Default for ServeSettings {
    fn default() -> Self {
        ServeSettings {
            port: 8080,
            export_dir: std::env::temp_dir(),
        }
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

impl Config {
    /// Read `path` (if given) and apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply `GSTN_*` overrides using `lookup` to read variables.
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.remote.url = Some(url.trim().to_string());
        }
        if let Some(raw) = get(ENV_FETCH_WORKERS) {
            self.fetch.workers = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_FETCH_WORKERS,
                        value: raw,
                    })
                }
            };
        }
        if let Some(dir) = get(ENV_EXPORT_DIR) {
            self.serve.export_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// The configured service URL, or `MissingUrl`.
    pub fn remote_url(&self) -> Result<&str, ConfigError> {
        self.remote
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_seconds)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            workers: self.fetch.workers,
            wait: Duration::from_secs(self.fetch.wait_seconds),
        }
    }
}
