//! Configuration for the kvpouch CLI.
//!
//! Stored as YAML in ~/.kvpouch/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".kvpouch";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Default store filename, relative to the config directory.
pub const DEFAULT_STORE_FILE: &str = "store.redb";
/// Default database location handed to the low-level adapter.
pub const DEFAULT_LOCATION: &str = "kvpouch";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to the redb store file. Relative paths resolve against the
    /// config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    /// Database location reported by the adapter.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,

    #[serde(skip)]
    config_path: PathBuf,
}

impl Config {
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR))
    }

    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the config directory path.
    pub fn dir(&self) -> Option<&Path> {
        self.config_path.parent()
    }

    /// Resolves the store path, preferring `flag` over the file value.
    pub fn store_path(&self, flag: Option<&Path>) -> PathBuf {
        let chosen = flag
            .map(Path::to_path_buf)
            .or_else(|| self.store.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
        match self.dir() {
            Some(dir) if chosen.is_relative() && flag.is_none() => dir.join(chosen),
            _ => chosen,
        }
    }

    pub fn location(&self) -> &str {
        if self.location.is_empty() {
            DEFAULT_LOCATION
        } else {
            &self.location
        }
    }
}

/// Loads configuration, creating an empty file when none exists yet.
pub fn load_config(custom_path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        cfg
    };

    cfg.config_path = config_path;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let cfg = load_config(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.location(), DEFAULT_LOCATION);
        assert_eq!(
            cfg.store_path(None),
            dir.path().join("nested").join(DEFAULT_STORE_FILE)
        );
    }

    #[test]
    fn test_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "store: data.redb\nlocation: notes\n").unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.location(), "notes");
        assert_eq!(cfg.store_path(None), dir.path().join("data.redb"));
        assert_eq!(
            cfg.store_path(Some(Path::new("/tmp/other.redb"))),
            PathBuf::from("/tmp/other.redb")
        );
    }
}
