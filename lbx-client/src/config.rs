//! Client configuration and source-mode selection
//!
//! Resolution order follows the usual priority: explicit path, then the
//! `LBX_*` environment, then the per-user TOML file, then built-in defaults.
//! The one mode toggle is the backend base URL: configured selects the REST
//! backend, absent selects direct repository reads.

use lbx_common::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_AGE, DEFAULT_SWEEP_INTERVAL};

/// Complete client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Backend API base URL (e.g. `http://localhost:8000`). Presence selects
    /// `BackendSource`; absence selects `RepositorySource`.
    #[serde(default)]
    pub backend_url: Option<String>,

    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub preload: PreloadConfig,
}

/// Where `RepositorySource` reads lesson files from.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    /// Repository identifier, `owner/name`.
    #[serde(default)]
    pub repo: String,

    /// Branch to read from.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Directory inside the repository holding the lesson files.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Structured content-listing API base.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Raw file-serving base, the fallback tier.
    #[serde(default = "default_raw_base")]
    pub raw_base: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            branch: default_branch(),
            content_dir: default_content_dir(),
            api_base: default_api_base(),
            raw_base: default_raw_base(),
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com/repos".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

/// Cache tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// Background sweep interval in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_max_age_secs() -> u64 {
    DEFAULT_MAX_AGE.as_secs()
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL.as_secs()
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Preload timing.
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadConfig {
    /// Settle delay before warming the next lesson, in milliseconds.
    #[serde(default = "default_next_delay_ms")]
    pub next_delay_ms: u64,

    /// Settle delay before warming a lesson list, in milliseconds.
    #[serde(default = "default_list_delay_ms")]
    pub list_delay_ms: u64,

    /// How many leading lessons of a listing to warm.
    #[serde(default = "default_warm_first")]
    pub warm_first: usize,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            next_delay_ms: default_next_delay_ms(),
            list_delay_ms: default_list_delay_ms(),
            warm_first: default_warm_first(),
        }
    }
}

fn default_next_delay_ms() -> u64 {
    1000
}

fn default_list_delay_ms() -> u64 {
    2000
}

fn default_warm_first() -> usize {
    3
}

impl PreloadConfig {
    pub fn next_delay(&self) -> Duration {
        Duration::from_millis(self.next_delay_ms)
    }

    pub fn list_delay(&self) -> Duration {
        Duration::from_millis(self.list_delay_ms)
    }
}

impl ClientConfig {
    /// Load configuration: `path` if given, else `$LBX_CONFIG`, else the
    /// per-user config file, else defaults. Environment variables override
    /// whatever the file supplied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_file(path)? {
            Some(file) => lbx_common::config::load_toml(&file)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn resolve_file(path: Option<&Path>) -> Result<Option<std::path::PathBuf>> {
        if let Some(path) = path {
            return Ok(Some(path.to_path_buf()));
        }
        if let Ok(env_path) = std::env::var("LBX_CONFIG") {
            return Ok(Some(env_path.into()));
        }
        let default = lbx_common::config::config_file("client")?;
        Ok(default.exists().then_some(default))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LBX_BACKEND_URL") {
            self.backend_url = if url.trim().is_empty() {
                None
            } else {
                Some(url)
            };
        }
        if let Ok(repo) = std::env::var("LBX_REPOSITORY") {
            self.repository.repo = repo;
        }
        if let Ok(branch) = std::env::var("LBX_BRANCH") {
            self.repository.branch = branch;
        }
    }
}
