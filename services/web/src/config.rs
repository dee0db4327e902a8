//! Service configuration
//!
//! Loaded once at start-up. Every value has a default and can be overridden
//! with a `MOVIEPICK_` prefixed environment variable, nested keys separated by
//! a double underscore (`MOVIEPICK_SERVER__PORT=8081`).

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Top-level configuration for the web service
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub catalog: CatalogConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Session cookie settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// Session lifetime in seconds (default: 30 minutes)
    pub ttl_seconds: u64,
}

/// Listing limits for movie queries
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub popular_limit: i64,
    pub autocomplete_limit: i64,
}

impl AppConfig {
    /// Build the configuration from defaults and environment overrides
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("session.cookie_name", "MPSESSION")?
            .set_default("session.ttl_seconds", 1800_i64)?
            .set_default("catalog.popular_limit", 10_i64)?
            .set_default("catalog.autocomplete_limit", 10_i64)?
            .add_source(
                Environment::with_prefix("MOVIEPICK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            session: SessionConfig {
                cookie_name: "MPSESSION".to_string(),
                ttl_seconds: 1800,
            },
            catalog: CatalogConfig {
                popular_limit: 10,
                autocomplete_limit: 10,
            },
        }
    }
}
