//! Configuration file helpers
//!
//! Each crate owns its configuration shape; this module only provides the
//! shared plumbing: locating the per-user config directory and reading a
//! TOML file into a typed struct.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Directory holding Lessonbox config files (`~/.config/lessonbox` on Linux).
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("lessonbox"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Path of a named config file inside the Lessonbox config directory,
/// e.g. `config_file("client")` -> `~/.config/lessonbox/client.toml`.
pub fn config_file(name: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(format!("{name}.toml")))
}

/// Read and parse a TOML config file.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        port: u16,
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sample.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "name = \"lessonbox\"\nport = 8000").expect("write");

        let sample: Sample = load_toml(&path).expect("should parse");
        assert_eq!(
            sample,
            Sample {
                name: "lessonbox".to_string(),
                port: 8000
            }
        );
    }

    #[test]
    fn test_load_toml_missing_file() {
        let err = load_toml::<Sample>(Path::new("/nonexistent/lessonbox.toml"))
            .expect_err("should fail");
        assert!(matches!(err, Error::Config(_)));
    }
}
