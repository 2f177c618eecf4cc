//! Service configuration loaded via OrthoConfig.
//!
//! All three binaries share one settings struct. Values come from CLI flags,
//! `APP_*` environment variables and configuration files, in OrthoConfig's
//! usual precedence. Optional fields fall back to local-development
//! defaults through the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:8081";
const DEFAULT_STATISTICS_SERVICE_URL: &str = "http://localhost:8082";
const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 5_000;

/// Which of the three services a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Accounts,
    Users,
    Statistics,
}

impl ServiceKind {
    /// Name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Accounts => "account-service",
            Self::Users => "user-service",
            Self::Statistics => "statistics-service",
        }
    }

    /// Listener address used when none is configured. The ports line up
    /// with the default peer URLs so a local start-up needs no settings.
    pub const fn default_bind_addr(self) -> &'static str {
        match self {
            Self::Accounts => "0.0.0.0:8080",
            Self::Users => "0.0.0.0:8081",
            Self::Statistics => "0.0.0.0:8082",
        }
    }

    /// Database used when none is configured.
    pub const fn default_database(self) -> &'static str {
        match self {
            Self::Accounts => "account_service",
            Self::Users => "user_service",
            Self::Statistics => "statistics_service",
        }
    }
}

/// Errors raised while validating loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid {field} '{value}': {message}")]
    Url {
        field: &'static str,
        value: String,
        message: String,
    },
    #[error("remote timeout must be greater than zero")]
    ZeroTimeout,
    #[error("database name must not be blank")]
    BlankDatabase,
}

/// Raw configuration shared by every service binary.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct ServiceSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// MongoDB connection string.
    pub mongo_uri: Option<String>,
    /// Database name; defaults per service.
    pub database: Option<String>,
    /// Base URL of the user service, used by the account service.
    pub user_service_url: Option<String>,
    /// Base URL of the statistics service.
    pub statistics_service_url: Option<String>,
    /// Timeout applied to each outbound call, in milliseconds.
    pub remote_timeout_ms: Option<u64>,
    /// Publish statistics on a spawned task instead of inline.
    #[ortho_config(default = true)]
    pub detached_statistics: bool,
    /// Use process-local stores instead of MongoDB.
    #[ortho_config(default = false)]
    pub in_memory: bool,
}

/// Settings after defaults are applied and values are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub service: ServiceKind,
    pub bind_addr: SocketAddr,
    pub mongo_uri: String,
    pub database: String,
    pub user_service_url: Url,
    pub statistics_service_url: Url,
    pub remote_timeout: Duration,
    pub detached_statistics: bool,
    pub in_memory: bool,
}

impl ServiceSettings {
    /// Configured bind address, falling back to the service default.
    pub fn bind_addr(&self, service: ServiceKind) -> &str {
        self.bind_addr
            .as_deref()
            .unwrap_or_else(|| service.default_bind_addr())
    }

    /// Configured connection string, falling back to a local server.
    pub fn mongo_uri(&self) -> &str {
        self.mongo_uri.as_deref().unwrap_or(DEFAULT_MONGO_URI)
    }

    /// Configured database name, falling back to the service default.
    pub fn database(&self, service: ServiceKind) -> &str {
        self.database
            .as_deref()
            .unwrap_or_else(|| service.default_database())
    }

    /// Configured outbound timeout.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms.unwrap_or(DEFAULT_REMOTE_TIMEOUT_MS))
    }

    /// Apply defaults and parse every value for `service`.
    ///
    /// # Errors
    /// Returns [`SettingsError`] for an unparsable address or URL, a zero
    /// timeout, or a blank database name.
    pub fn resolve(&self, service: ServiceKind) -> Result<ResolvedSettings, SettingsError> {
        let raw_addr = self.bind_addr(service);
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|err| SettingsError::BindAddr {
                value: raw_addr.to_owned(),
                message: err.to_string(),
            })?;
        let remote_timeout = self.remote_timeout();
        if remote_timeout.is_zero() {
            return Err(SettingsError::ZeroTimeout);
        }
        let database = self.database(service).trim();
        if database.is_empty() {
            return Err(SettingsError::BlankDatabase);
        }
        Ok(ResolvedSettings {
            service,
            bind_addr,
            mongo_uri: self.mongo_uri().to_owned(),
            database: database.to_owned(),
            user_service_url: parse_url(
                "user service URL",
                self.user_service_url
                    .as_deref()
                    .unwrap_or(DEFAULT_USER_SERVICE_URL),
            )?,
            statistics_service_url: parse_url(
                "statistics service URL",
                self.statistics_service_url
                    .as_deref()
                    .unwrap_or(DEFAULT_STATISTICS_SERVICE_URL),
            )?,
            remote_timeout,
            detached_statistics: self.detached_statistics,
            in_memory: self.in_memory,
        })
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    let url = Url::parse(value).map_err(|err| SettingsError::Url {
        field,
        value: value.to_owned(),
        message: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(SettingsError::Url {
            field,
            value: value.to_owned(),
            message: "expected an http(s) base URL".to_owned(),
        });
    }
    Ok(url)
}
