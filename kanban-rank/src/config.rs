//! Engine configuration loaded with figment
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. `kanban-rank.toml`, `kanban-rank.yaml`, `kanban-rank.yml` or
//!    `kanban-rank.json` in the working directory (or an explicit file)
//! 3. `KANBAN_RANK_*` environment variables, e.g. `KANBAN_RANK_MAX_DEPTH=32`

use crate::rank::{RankCodec, DEFAULT_MAX_DEPTH};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Base name of discovered configuration files
pub const CONFIG_FILE_STEM: &str = "kanban-rank";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "KANBAN_RANK_";

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested configuration file does not exist
    #[error("configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// Configuration validation failed
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration file format not supported
    #[error("unsupported configuration file format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Tunables for the ordering engine and its reference stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Symbol positions `between` searches before reporting exhaustion
    pub max_depth: usize,
    /// Default number of entries returned when reading the activity log
    pub activity_limit: usize,
    /// Root directory of the file-backed store
    pub root: PathBuf,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            activity_limit: 50,
            root: PathBuf::from(".kanban-rank"),
        }
    }
}

impl RankConfig {
    /// Load from defaults, files in the current directory and the environment
    pub fn load() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_in(&cwd)
    }

    /// Load from defaults, files discovered in `dir` and the environment
    pub fn load_in(dir: &Path) -> ConfigResult<Self> {
        let mut figment = Self::defaults();
        for ext in ["toml", "yaml", "yml", "json"] {
            let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
            if path.is_file() {
                trace!("Loading config file: {}", path.display());
                figment = figment.merge(Self::file_provider(&path)?);
            }
        }
        Self::finish(figment.merge(Self::env()))
    }

    /// Load from defaults, one explicit file and the environment
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let figment = Self::defaults()
            .merge(Self::file_provider(path)?)
            .merge(Self::env());
        Self::finish(figment)
    }

    /// Codec configured with this search depth
    pub fn codec(&self) -> RankCodec {
        RankCodec::new(self.max_depth)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth < 2 {
            return Err(ConfigError::InvalidValue {
                key: "max_depth".into(),
                message: format!("must be at least 2, got {}", self.max_depth),
            });
        }
        if self.activity_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "activity_limit".into(),
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX)
    }

    fn file_provider(path: &Path) -> ConfigResult<Figment> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Figment::from(Toml::file(path))),
            Some("yaml") | Some("yml") => Ok(Figment::from(Yaml::file(path))),
            Some("json") => Ok(Figment::from(Json::file(path))),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn finish(figment: Figment) -> ConfigResult<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        debug!(
            max_depth = config.max_depth,
            activity_limit = config.activity_limit,
            root = %config.root.display(),
            "Loaded kanban-rank configuration"
        );
        Ok(config)
    }
}
