//! # rizz-config
//!
//! Layered configuration loading for rizz using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RIZZ_*` prefix, `__` as separator)
//! 2. Project-level `.rizz/config.toml`
//! 3. User-level `~/.config/rizz/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RIZZ_BACKEND__BASE_URL` -> `backend.base_url`,
//! `RIZZ_DIRECTORY__PAGE_SIZE` -> `directory.page_size`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rizz_config::RizzConfig;
//!
//! let config = RizzConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.backend.base_url);
//! ```

mod account;
mod analysis;
mod backend;
mod directory;
mod error;

pub use account::AccountConfig;
pub use analysis::{AnalysisConfig, ProgressCheckpoints};
pub use backend::BackendConfig;
pub use directory::DirectoryConfig;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RizzConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub account: AccountConfig,
}

impl RizzConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`RizzConfig::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`RizzConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".rizz/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("RIZZ_").split("__"))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.directory.validate()?;
        self.analysis.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rizz").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RizzConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.backend.base_url, "http://localhost:5050/api");
        assert!(!config.account.is_configured());
    }

    #[test]
    fn figment_builds_without_files() {
        let config: RizzConfig = RizzConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.directory.page_size, 20);
        assert_eq!(config.analysis.checkpoints.done, 100);
    }
}
