use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL. Not needed when running against the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Directory that spreadsheet and document exports are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// The terminal belongs to the UI, so logs go to a file
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    #[serde(default)]
    pub app_username: Option<String>,

    #[serde(default)]
    pub app_password: Option<String>,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("consulting_evaluator.log")
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL is not set (use --in-memory to run without a database)")
    }

    /// Login credentials, if both halves are configured and non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.app_username.as_deref().filter(|value| !value.is_empty())?;
        let password = self.app_password.as_deref().filter(|value| !value.is_empty())?;
        Some((username, password))
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = from_pairs(&[]);

        assert!(config.database_url().is_err());
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.log_file, PathBuf::from("consulting_evaluator.log"));
        assert!(config.credentials().is_none());
    }

    #[test]
    fn reads_database_and_credentials() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgres://localhost/evaluator"),
            ("EXPORT_DIR", "/tmp/out"),
            ("APP_USERNAME", "alice"),
            ("APP_PASSWORD", "s3cret"),
        ]);

        assert_eq!(config.database_url().unwrap(), "postgres://localhost/evaluator");
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.credentials(), Some(("alice", "s3cret")));
    }

    #[test]
    fn half_configured_credentials_are_ignored() {
        let config = from_pairs(&[("APP_USERNAME", "alice")]);
        assert!(config.credentials().is_none());

        let config = from_pairs(&[("APP_USERNAME", "alice"), ("APP_PASSWORD", "")]);
        assert!(config.credentials().is_none());
    }
}
