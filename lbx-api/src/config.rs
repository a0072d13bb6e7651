//! Service configuration: content directory and listen port
//!
//! Resolution priority: command-line arguments (which also absorb the
//! `LBX_*` environment via clap), then the TOML config file, then built-in
//! defaults.

use lbx_common::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Bootstrap configuration for the content API.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding the Markdown lesson files.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            port: default_port(),
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("./content")
}

fn default_port() -> u16 {
    8000
}

/// Command-line / environment overrides applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub content_dir: Option<PathBuf>,
    pub port: Option<u16>,
}

impl ServiceConfig {
    /// Resolve the effective configuration.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let file = match &overrides.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = lbx_common::config::config_file("api")?;
                default.exists().then_some(default)
            }
        };

        let mut config = match file {
            Some(path) => lbx_common::config::load_toml(&path)?,
            None => Self::default(),
        };

        if let Some(content_dir) = overrides.content_dir {
            config.content_dir = content_dir;
        }
        if let Some(port) = overrides.port {
            config.port = port;
        }
        Ok(config)
    }
}
