//! Application settings loading from config.toml and the environment.
//!
//! Server and token-lifetime settings come from an optional config.toml; the
//! signing secret is only ever read from the `JWT_SECRET` environment variable
//! so it never lands in a checked-in file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Token issuance settings
    #[serde(default)]
    pub auth: AuthSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Token issuance settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Lifetime of access tokens, in minutes
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
    /// Lifetime of refresh tokens, in days
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
    /// HMAC signing secret, populated from `JWT_SECRET`
    #[serde(skip)]
    pub jwt_secret: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

const fn default_access_token_minutes() -> i64 {
    15
}

const fn default_refresh_token_days() -> i64 {
    7
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            access_token_minutes: default_access_token_minutes(),
            refresh_token_days: default_refresh_token_days(),
            jwt_secret: String::new(),
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from ./config.toml when present, falling back to defaults,
/// then fills the signing secret from the `JWT_SECRET` environment variable.
///
/// # Errors
/// Returns an error if config.toml exists but is invalid, or if `JWT_SECRET`
/// is unset.
pub fn load() -> Result<Settings> {
    let path = Path::new("config.toml");
    let mut settings = if path.exists() {
        load_settings(path)?
    } else {
        Settings {
            server: ServerSettings::default(),
            auth: AuthSettings::default(),
        }
    };

    settings.auth.jwt_secret = std::env::var("JWT_SECRET").map_err(|_| Error::Config {
        message: "JWT_SECRET environment variable is not set".to_string(),
    })?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:9000"

            [auth]
            access_token_minutes = 30
            refresh_token_days = 14
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(settings.auth.access_token_minutes, 30);
        assert_eq!(settings.auth.refresh_token_days, 14);
        assert!(settings.auth.jwt_secret.is_empty());
    }

    #[test]
    fn test_defaults_apply_to_missing_sections() {
        let settings: Settings = toml::from_str("").unwrap();

        assert_eq!(settings.server.bind_addr, "127.0.0.1:8000");
        assert_eq!(settings.auth.access_token_minutes, 15);
        assert_eq!(settings.auth.refresh_token_days, 7);
    }
}
