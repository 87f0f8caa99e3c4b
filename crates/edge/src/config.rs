//! Edge configuration.
//!
//! Everything here is resolved once at startup into an immutable value;
//! nothing re-reads the environment per request.

use serde::Deserialize;
use thiserror::Error;

use revhub_gate::{RouteTable, RouteTableError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("auth cookie name must not be empty")]
    EmptyCookieName,

    #[error("{field} must start with '/': {value}")]
    RelativePath { field: &'static str, value: String },

    #[error(transparent)]
    Routes(#[from] RouteTableError),
}

/// Edge process configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Cookie the login collaborator stores the bearer credential in.
    #[serde(default = "default_auth_cookie")]
    pub auth_cookie: String,

    /// Redirect target for missing/dead credentials.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Redirect target for insufficient-role denials.
    #[serde(default = "default_unauthorized_path")]
    pub unauthorized_path: String,

    /// Where authenticated clients land instead of the landing page.
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,

    #[serde(default)]
    pub routes: RouteTable,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_auth_cookie() -> String {
    "revhub_token".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_unauthorized_path() -> String {
    "/unauthorized".to_string()
}

fn default_dashboard_path() -> String {
    "/dashboard".to_string()
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            auth_cookie: default_auth_cookie(),
            login_path: default_login_path(),
            unauthorized_path: default_unauthorized_path(),
            dashboard_path: default_dashboard_path(),
            routes: RouteTable::default(),
        }
    }
}

impl EdgeConfig {
    /// Resolve configuration from the environment.
    ///
    /// `REVHUB_CONFIG` names a JSON config file; without it the built-in
    /// defaults apply. `REVHUB_LISTEN` and `REVHUB_AUTH_COOKIE` override
    /// either source. The result is validated before use.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("REVHUB_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => {
                tracing::info!("REVHUB_CONFIG not set; using built-in defaults");
                Self::default()
            }
        };

        if let Ok(listen) = std::env::var("REVHUB_LISTEN") {
            config.listen = listen;
        }
        if let Ok(name) = std::env::var("REVHUB_AUTH_COOKIE") {
            config.auth_cookie = name;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_cookie.trim().is_empty() {
            return Err(ConfigError::EmptyCookieName);
        }

        for (field, value) in [
            ("login_path", &self.login_path),
            ("unauthorized_path", &self.unauthorized_path),
            ("dashboard_path", &self.dashboard_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::RelativePath {
                    field,
                    value: value.clone(),
                });
            }
        }

        self.routes.validate()?;
        Ok(())
    }
}
