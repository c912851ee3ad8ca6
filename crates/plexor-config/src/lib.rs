//! Shared configuration for the plexor client tooling.
//!
//! [`Config`] is assembled by `ortho_config` from, in increasing order of
//! precedence, built-in defaults, a TOML file named by `--config-path` or
//! `PLEXOR_CONFIG_PATH`, `PLEXOR_*` environment variables and command-line
//! flags. The CLI turns the loaded value into a client configuration.

mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_HOST, DEFAULT_IDENTIFIER, DEFAULT_PORT,
    default_connect_timeout_secs, default_host, default_identifier, default_log_filter_string,
    default_log_format, default_port,
};
pub use logging::LogFormat;

/// Connection, identity and logging settings for the push server client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PLEXOR")]
#[serde(default)]
pub struct Config {
    /// Host name or address of the push server.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port of the push server.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Identifier announced in every request header.
    #[serde(default = "default_identifier")]
    pub identifier: String,
    /// Optional tenant namespace prepended to every channel identifier.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Login used for authenticated servers.
    #[serde(default)]
    pub login: Option<String>,
    /// Password paired with [`Config::login`].
    #[serde(default)]
    pub password: Option<String>,
    /// Seconds allowed for establishing the TCP connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: Option<u64>,
    /// Seconds allowed for each blocking read or write; unset means no limit.
    #[serde(default)]
    pub io_timeout_secs: Option<u64>,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            identifier: default_identifier(),
            namespace: None,
            login: None,
            password: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            io_timeout_secs: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

/// Login and password pair borrowed from a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    /// Account login.
    pub login: &'a str,
    /// Account password.
    pub password: &'a str,
}

/// Raised when only half of a login/password pair is configured.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    /// A login was configured without a password.
    #[error("login '{login}' is configured without a password")]
    MissingPassword {
        /// The configured login.
        login: String,
    },
    /// A password was configured without a login.
    #[error("a password is configured without a login")]
    MissingLogin,
}

impl Config {
    /// Host name or address of the push server.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port of the push server.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Identifier announced in request headers.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Configured namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the credentials when both halves are present.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] when only the login or only the password
    /// is set.
    pub fn credentials(&self) -> Result<Option<Credentials<'_>>, CredentialsError> {
        match (self.login.as_deref(), self.password.as_deref()) {
            (Some(login), Some(password)) => Ok(Some(Credentials { login, password })),
            (Some(login), None) => Err(CredentialsError::MissingPassword {
                login: login.to_owned(),
            }),
            (None, Some(_)) => Err(CredentialsError::MissingLogin),
            (None, None) => Ok(None),
        }
    }

    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Read/write timeout as a [`Duration`].
    #[must_use]
    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_secs.map(Duration::from_secs)
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
