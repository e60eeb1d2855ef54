//! User configuration
//!
//! Read from `config.toml` in the data directory:
//! ```toml
//! data_dir = "/custom/path"
//! api_key = "..."
//! session_size = 10
//! ```
//! `VOCABUILDER_API_KEY` overrides the configured key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::SESSION_SIZE;
use crate::store::FileStore;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable that overrides `api_key`
pub const API_KEY_ENV: &str = "VOCABUILDER_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("session_size must be at least 1")]
    InvalidSessionSize,

    #[error("Data directory not found")]
    DataDirNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where collections are stored; defaults to the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Translation provider key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Maximum cards per review session
    pub session_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            api_key: None,
            session_size: SESSION_SIZE,
        }
    }
}

impl Config {
    /// Load `config.toml` from the default data directory
    pub fn load() -> Result<Self, ConfigError> {
        let dir = FileStore::default_data_dir().map_err(|_| ConfigError::DataDirNotFound)?;
        let mut config = Self::load_from(&dir.join(CONFIG_FILE_NAME))?;
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load a config file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&content).map_err(|e| match e {
            ParseFailure::Toml(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Invalid(e) => e,
        })
    }

    fn parse(content: &str) -> Result<Self, ParseFailure> {
        let config: Config = toml::from_str(content).map_err(ParseFailure::Toml)?;
        if config.session_size == 0 {
            return Err(ParseFailure::Invalid(ConfigError::InvalidSessionSize));
        }
        Ok(config)
    }

    fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Configured data directory, or the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStore::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }
}

#[derive(Debug)]
enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}
