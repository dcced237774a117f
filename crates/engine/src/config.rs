//! Engine configuration
//!
//! Loaded from `mqlfix.toml`, discovered by walking up from the target
//! directory. Every field has a default, so an absent or empty file is
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file discovered next to (or above) the sources
pub const CONFIG_FILE_NAME: &str = "mqlfix.toml";

/// Error loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid toml for this schema
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },
}

/// Runtime options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retag MQL documents to the C++ language identifier
    pub force_cpp_mode: bool,
    /// Raise log verbosity to debug
    pub debug: bool,
    /// Bounded-scan window width in bytes
    pub scan_limit: usize,
    /// Format with the bundled clang-format style instead of a user command
    pub use_bundled_clang_format: bool,
    /// External formatter argv used when the bundled style is disabled;
    /// the file path is appended. Absent means the format step is skipped.
    pub formatter: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            force_cpp_mode: true,
            debug: false,
            scan_limit: 100,
            use_bundled_clang_format: true,
            formatter: None,
        }
    }
}

impl Config {
    /// Load configuration from a toml file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find and load `mqlfix.toml` by walking up from `start`
    ///
    /// Falls back to defaults when no config file exists on the way to the
    /// filesystem root.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        let mut current = Some(start);
        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
            current = dir.parent();
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.force_cpp_mode);
        assert!(!config.debug);
        assert_eq!(config.scan_limit, 100);
        assert!(config.use_bundled_clang_format);
        assert!(config.formatter.is_none());
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let config: Config = toml::from_str("scan_limit = 40\ndebug = true\n").unwrap();
        assert_eq!(config.scan_limit, 40);
        assert!(config.debug);
        assert!(config.force_cpp_mode);
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "scan_limit = 7\n").unwrap();

        let config = Config::discover(&nested).unwrap();
        assert_eq!(config.scan_limit, 7);
    }

    #[test]
    fn test_discover_without_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.scan_limit, 100);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "scan_limit = \"many\"\n").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
