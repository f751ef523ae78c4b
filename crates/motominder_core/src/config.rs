//! Runtime configuration loader.
//!
//! # Responsibility
//! - Merge an optional TOML file with `MOTOMINDER_*` environment variables.
//! - Reject configurations the core cannot run with.
//!
//! # Invariants
//! - Environment values override file values.
//! - A loaded config has `tenant_id >= 0`, a supported log level and, when
//!   set, an absolute log directory.

use crate::logging::{default_log_level, parse_level};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory by [`CoreConfig::load`].
pub const DEFAULT_CONFIG_FILE: &str = "motominder.toml";
pub const ENV_PREFIX: &str = "MOTOMINDER";

#[derive(Debug)]
pub enum ConfigError {
    Load(config::ConfigError),
    InvalidTenant(i64),
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
            Self::InvalidTenant(tenant_id) => {
                write!(f, "tenant_id must be zero or positive, got {tenant_id}")
            }
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log_dir must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(value: config::ConfigError) -> Self {
        Self::Load(value)
    }
}

/// Core runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoreConfig {
    /// SQLite file; `None` keeps the store in memory.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub tenant_id: i64,
    #[serde(default = "default_level")]
    pub log_level: String,
    /// Rolling log directory; `None` disables file logging.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            tenant_id: 0,
            log_level: default_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Loads `motominder.toml` from the working directory (if present) and
    /// the process environment.
    ///
    /// # Errors
    /// Fails when a source cannot be parsed or the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(Path::new(DEFAULT_CONFIG_FILE)))
    }

    /// Same as [`CoreConfig::load`] with an explicit, optional file path.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn build(file: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        let settings = builder
            .add_source(
                environment
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: CoreConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant_id < 0 {
            return Err(ConfigError::InvalidTenant(self.tenant_id));
        }
        parse_level(&self.log_level)
            .map_err(|err| ConfigError::InvalidLogLevel(err.to_string()))?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }
}
