//! Login gate for the interactive UI and the export command.
//!
//! This is a placeholder, not a security mechanism: the credentials are a
//! single configured pair compared in plain text, with no hashing, rate
//! limiting or lockout. Leaving `APP_USERNAME` or `APP_PASSWORD` unset
//! refuses every login.

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login is disabled: APP_USERNAME and APP_PASSWORD are not configured")]
    NotConfigured,
}

/// Proof of a successful login, handed to every authenticated operation.
///
/// Only [`authenticate`] creates one; dropping it logs the user out.
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    issued_at: DateTime<Local>,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn issued_at(&self) -> DateTime<Local> {
        self.issued_at
    }
}

pub fn authenticate(config: &Config, username: &str, password: &str) -> Result<Session, AuthError> {
    let (expected_user, expected_password) = config.credentials().ok_or(AuthError::NotConfigured)?;

    if username != expected_user || password != expected_password {
        tracing::warn!(username, "rejected login");
        return Err(AuthError::InvalidCredentials);
    }

    tracing::info!(username, "logged in");
    Ok(Session {
        username: username.to_string(),
        issued_at: Local::now(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(username: Option<&str>, password: Option<&str>) -> Config {
        Config {
            database_url: None,
            export_dir: PathBuf::from("exports"),
            log_file: PathBuf::from("test.log"),
            app_username: username.map(str::to_string),
            app_password: password.map(str::to_string),
        }
    }

    #[test]
    fn accepts_configured_pair() {
        let session = authenticate(&config(Some("test"), Some("test")), "test", "test").unwrap();
        assert_eq!(session.username(), "test");
    }

    #[test]
    fn rejects_wrong_password() {
        let result = authenticate(&config(Some("test"), Some("test")), "test", "nope");
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[test]
    fn refuses_everything_when_unconfigured() {
        let result = authenticate(&config(None, None), "test", "test");
        assert_eq!(result.unwrap_err(), AuthError::NotConfigured);

        let result = authenticate(&config(Some("test"), None), "test", "");
        assert_eq!(result.unwrap_err(), AuthError::NotConfigured);
    }
}
