//! Tool configuration.
//!
//! The target file list and the patch rule can come from a `pvctool.toml`
//! file, from command-line arguments, or both; command-line values win.
//!
//! # Configuration File Format
//!
//! ```toml
//! files = [
//!     "storage/network-storage.yaml",
//!     "media/media-stack.yaml",
//!     "smart-home/home-assistant.yaml",
//! ]
//!
//! [rule]
//! access_mode = "ReadWriteMany"
//! from_class = "local-path"
//! to_class = "nfs"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::patch::PatchRule;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "pvctool.toml";

/// Root configuration structure.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Manifest files to process, in order.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// The storage class migration rule.
    #[serde(default)]
    pub rule: PatchRule,
}

impl Config {
    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("can not open config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Loads `pvctool.toml` from the working directory if present,
    /// otherwise returns the defaults.
    pub fn load_default() -> anyhow::Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_NAME);
        if path.exists() {
            Self::load(path)
        } else {
            debug!("no {DEFAULT_CONFIG_NAME} found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_full_config_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pvctool.toml");
        fs::write(
            &path,
            "\
files = [\"storage/network-storage.yaml\", \"media/media-stack.yaml\"]

[rule]
access_mode = \"ReadWriteMany\"
from_class = \"local-path\"
to_class = \"nfs\"
",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.files.len(), 2);
        assert_eq!(config.files[0], PathBuf::from("storage/network-storage.yaml"));
        assert_eq!(config.rule, PatchRule::default());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pvctool.toml");
        fs::write(&path, "files = [\"a.yaml\"]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.rule, PatchRule::default());
    }

    #[test]
    fn test_partial_rule_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pvctool.toml");
        fs::write(&path, "[rule]\nto_class = \"ceph\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.rule.to_class, "ceph");
        assert_eq!(config.rule.from_class, "local-path");
        assert_eq!(config.rule.access_mode, "ReadWriteMany");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pvctool.toml");
        fs::write(&path, "files = not-a-list\n").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
