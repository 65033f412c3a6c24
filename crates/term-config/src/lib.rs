//! # term-config
//!
//! Layered configuration loading for termbase using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TERMBASE_*` prefix, `__` as separator)
//! 2. Project-level `.termbase/config.toml`
//! 3. User-level `~/.config/termbase/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `TERMBASE_DATABASE__PATH` -> `database.path`,
//! `TERMBASE_EXPORT__TERMS` -> `export.terms`, and so on.
//!
//! ```no_run
//! use term_config::TermConfig;
//!
//! let config = TermConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod export;
mod general;
mod import;

pub use database::{DatabaseConfig, IN_MEMORY};
pub use error::ConfigError;
pub use export::ExportConfig;
pub use general::GeneralConfig;
pub use import::ImportConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".termbase/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TermConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TermConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does not read `.env`; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("TERMBASE_").split("__"))
    }

    /// Reject values that parse but can not work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.import.default_source_language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "import.default_source_language".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("termbase").join("config.toml"))
    }
}
