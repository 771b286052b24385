//! Configuration loading and representation.
//!
//! Everything comes from environment variables so the same binary runs in
//! dev (in-memory stores) and against Postgres.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

/// Credentials for the superuser created at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SuperuserSeed {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for SuperuserSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SuperuserSeed")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Mount point of the order routes; empty means the root.
    pub api_prefix: String,
    /// `Some` when persistent (Postgres) stores are enabled.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub superuser: Option<SuperuserSeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_prefix: String::new(),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            superuser: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("ORDERDESK_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "ORDERDESK_BIND_ADDR",
                reason: e.to_string(),
            })?;

        let api_prefix = normalize_prefix(&lookup("ORDERDESK_API_PREFIX").unwrap_or_default());

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(raw) => raw.trim().parse::<bool>().map_err(|e| ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                reason: e.to_string(),
            })?,
        };

        let database_url = if use_persistent {
            Some(
                lookup("DATABASE_URL")
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            )
        } else {
            None
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                var: "DATABASE_MAX_CONNECTIONS",
                reason: e.to_string(),
            })?,
        };

        let superuser = match (
            lookup("ORDERDESK_SUPERUSER_EMAIL"),
            lookup("ORDERDESK_SUPERUSER_PASSWORD"),
        ) {
            (Some(email), Some(password)) if !email.trim().is_empty() => {
                Some(SuperuserSeed { email, password })
            }
            _ => None,
        };

        Ok(Self {
            bind_addr,
            api_prefix,
            database_url,
            max_connections,
            superuser,
        })
    }
}

/// `"api/order/"` -> `"/api/order"`, `"/"` -> `""`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
