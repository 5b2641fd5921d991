//! Settings file and environment overrides.
//!
//! Precedence, highest first: command-line flags, environment
//! (`DATABASE_URL`, `TICTAC_API_URL`), `tictac.toml`, built-in defaults.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// File read when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "tictac.toml";

/// Environment variable overriding the database path.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable overriding the client's API root.
pub const API_URL_VAR: &str = "TICTAC_API_URL";

/// Backend settings, `[server]` in the file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// SQLite database file.
    database_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "tictac.db".to_string(),
        }
    }
}

impl ServerSettings {
    /// Replaces each field that has an override.
    pub fn override_with(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        database_url: Option<String>,
    ) {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
    }
}

/// Front end settings, `[client]` in the file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// API root the REST gateway talks to.
    api_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080/api/".to_string(),
        }
    }
}

impl ClientSettings {
    /// Replaces the API root if an override is given.
    pub fn override_with(&mut self, api_url: Option<String>) {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend settings.
    server: ServerSettings,
    /// Front end settings.
    client: ClientSettings,
}

impl Settings {
    /// Loads settings from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid settings TOML.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let settings = Self::from_toml(&content)?;
        info!("Config loaded");
        Ok(settings)
    }

    /// Resolves file and environment layers.
    ///
    /// An explicit `path` must exist. Without one, `tictac.toml` in the
    /// working directory is used if present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen file cannot be read or parsed.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let database_url = lookup(DATABASE_URL_VAR);
        let api_url = lookup(API_URL_VAR);
        debug!(
            database_url = database_url.is_some(),
            api_url = api_url.is_some(),
            "Applying environment overrides"
        );
        self.server.override_with(None, None, database_url);
        self.client.override_with(api_url);
    }

    /// Mutable backend settings, for command-line overrides.
    pub fn server_mut(&mut self) -> &mut ServerSettings {
        &mut self.server
    }

    /// Mutable front end settings, for command-line overrides.
    pub fn client_mut(&mut self) -> &mut ClientSettings {
        &mut self.client
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new config error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server().host(), "127.0.0.1");
        assert_eq!(*settings.server().port(), 8080);
        assert_eq!(settings.server().database_url(), "tictac.db");
        assert_eq!(settings.client().api_url(), "http://127.0.0.1:8080/api/");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml("[server]\nport = 9000\n").unwrap();
        assert_eq!(*settings.server().port(), 9000);
        assert_eq!(settings.server().host(), "127.0.0.1");
        assert_eq!(settings.client(), &ClientSettings::default());
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(Settings::from_toml("[server]\nport = \"high\"\n").is_err());
    }

    #[test]
    fn test_env_beats_file_and_flags_beat_env() {
        let mut settings =
            Settings::from_toml("[server]\ndatabase_url = \"file.db\"\n[client]\napi_url = \"http://file/api/\"\n")
                .unwrap();

        settings.apply_env(|key| match key {
            DATABASE_URL_VAR => Some("env.db".to_string()),
            _ => None,
        });
        assert_eq!(settings.server().database_url(), "env.db");
        assert_eq!(settings.client().api_url(), "http://file/api/");

        settings
            .server_mut()
            .override_with(None, Some(3000), Some("flag.db".to_string()));
        assert_eq!(settings.server().database_url(), "flag.db");
        assert_eq!(*settings.server().port(), 3000);
    }
}
