//! # tgreports configuration
//!
//! Layered configuration for a reporter process.
//!
//! ## Features
//! - **Bundled defaults**: a default resource is compiled into the crate
//! - **Working-directory override**: `tgreports.yaml` next to the process
//! - **Environment overrides**: `TGREPORTS_*` variables, nested with `__`
//! - **Validation**: mode, chat id, URL, level and rotation are checked on load

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod logging;
mod reporter;
mod telegram;
mod validation;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use reporter::ReporterConfig;
pub use telegram::TelegramConfig;

/// Working-directory configuration file that overrides the bundled defaults.
pub const CONFIG_FILE: &str = "tgreports.yaml";

/// Prefix of environment overrides, e.g. `TGREPORTS_TELEGRAM__TOKEN`.
pub const ENV_PREFIX: &str = "TGREPORTS_";

const BUNDLED_DEFAULTS: &str = include_str!("../default.yaml");

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq, Eq)]
pub struct ReportsConfig {
    /// Reporter identity (deployment mode).
    #[validate(nested)]
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Chat transport credentials.
    #[validate(nested)]
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// File logging destinations.
    #[validate(nested)]
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReportsConfig {
    /// Load configuration from the bundled defaults, the working directory and
    /// the environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. Bundled `default.yaml`
    /// 3. `tgreports.yaml` in the working directory, if present
    /// 4. `TGREPORTS_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Self::base();
        if Path::new(CONFIG_FILE).exists() {
            figment = figment.merge(Yaml::file(CONFIG_FILE));
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file on top of the bundled defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Self::base()
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(ReportsConfig::default()))
            .merge(Yaml::string(BUNDLED_DEFAULTS))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = ReportsConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn bundled_defaults_apply() {
        Jail::expect_with(|_jail| {
            let config = ReportsConfig::load().expect("defaults load");
            assert_eq!(config.reporter.mode, "DEV");
            assert_eq!(config.logging.rotation, "daily");
            assert_eq!(config.telegram.api_url, "https://api.telegram.org");
            assert!(!config.telegram.is_configured());
            Ok(())
        });
    }

    #[test]
    fn working_directory_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                "reporter:\n  mode: PROD\ntelegram:\n  token: \"123:abc\"\n  chat_id: -100200300\n",
            )?;
            let config = ReportsConfig::load().expect("override loads");
            assert_eq!(config.reporter.mode, "PROD");
            assert_eq!(config.telegram.chat_id, "-100200300");
            assert!(config.telegram.is_configured());
            assert_eq!(config.logging.journal_file, "journal.log");
            Ok(())
        });
    }

    #[test]
    fn environment_override() {
        Jail::expect_with(|jail| {
            jail.set_env("TGREPORTS_REPORTER__MODE", "PRE");
            jail.set_env("TGREPORTS_TELEGRAM__CHAT_ID", "-42");
            jail.set_env("TGREPORTS_LOGGING__CONSOLE", "false");
            let config = ReportsConfig::load().expect("env loads");
            assert_eq!(config.reporter.mode, "PRE");
            assert_eq!(config.telegram.chat_id, "-42");
            assert!(!config.logging.console);
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "logging:\n  rotation: weekly\n")?;
            let err = ReportsConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("logging.rotation"));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file() {
        let err = ReportsConfig::load_from_path("/nonexistent/tgreports.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
