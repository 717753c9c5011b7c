//! Viewer configuration loaded from `~/.config/antmark/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{Error, IoOperation, Result};

/// Tunables for frame loading. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Decoded frames kept in memory
    pub cache_capacity: usize,
    /// Frames to warm ahead of the current one
    pub prefetch_window: usize,
    /// Frame image extensions, matched case-insensitively
    pub frame_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            prefetch_window: 8,
            frame_extensions: vec!["jpg".to_string(), "jpeg".to_string()],
        }
    }
}

impl Config {
    /// Parse configuration text
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(Error::io(IoOperation::Read, path))?;
        Self::from_toml(&text, path)
    }
}

/// Load the user's configuration, or the defaults if there is none.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load() -> anyhow::Result<Config> {
    let path = config_path();
    Config::load_from(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Return the path to the config file.
#[must_use]
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("antmark")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        Config::from_toml(text, Path::new("config.toml"))
    }

    #[test]
    fn parse_empty_config() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse("cache_capacity = 12\n").unwrap();
        assert_eq!(config.cache_capacity, 12);
        assert_eq!(config.prefetch_window, 8);
        assert_eq!(config.frame_extensions, vec!["jpg", "jpeg"]);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
cache_capacity = 250
prefetch_window = 3
frame_extensions = ["png"]
"#;
        let config = parse(toml_str).unwrap();
        assert_eq!(config.cache_capacity, 250);
        assert_eq!(config.prefetch_window, 3);
        assert_eq!(config.frame_extensions, vec!["png"]);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse("cache_size = 3\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().starts_with("invalid config config.toml:"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_path_ends_with_crate_dir() {
        assert!(config_path().ends_with("antmark/config.toml"));
    }
}
