//! Application configuration.
//!
//! `SentaConfig` carries the three recognised options: the listener settings
//! (`server`), an override for the listener construction (`create_server`) and
//! the outbound-call capability (`fetch`). Capabilities are injected here and
//! never discovered from the environment.
//!
//! ```rust
//! use senta::config::{SentaConfig, ServerConfig};
//!
//! let config = SentaConfig::new().with_port(8080);
//! assert_eq!(config.server.port, 8080);
//!
//! let server = ServerConfig::from_vars(|key| match key {
//!     "SENTA_PORT" => Some("4000".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//! assert_eq!(server.port, 4000);
//! assert_eq!(server.host, "127.0.0.1");
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::HttpAdapter;
use crate::fetch::Fetch;

pub const PORT_VAR: &str = "SENTA_PORT";
pub const HOST_VAR: &str = "SENTA_HOST";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {message}")]
    ParseError { key: String, message: String },

    #[error("Failed to load .env file: {0}")]
    DotenvError(#[from] dotenv::Error),
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind port. `0` asks the OS for a free port.
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment, reading `.env` first when present
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is not an error
        let _ = dotenv::dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an explicit `.env` file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        dotenv::from_path(path.into())?;
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from a variable lookup, falling back to defaults for unset keys
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup(PORT_VAR) {
            config.port = port
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::ParseError {
                    key: PORT_VAR.to_string(),
                    message: e.to_string(),
                })?;
        }

        if let Some(host) = lookup(HOST_VAR) {
            let host = host.trim();
            if !host.is_empty() {
                config.host = host.to_string();
            }
        }

        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Default)]
pub struct SentaConfig {
    pub server: ServerConfig,
    /// Listener override; the axum listener is used when unset
    pub create_server: Option<Arc<dyn HttpAdapter>>,
    /// Outbound-call capability, used by test and diagnostic tooling only
    pub fetch: Option<Arc<dyn Fetch>>,
}

impl SentaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.host = host.into();
        self
    }

    pub fn with_server(mut self, adapter: Arc<dyn HttpAdapter>) -> Self {
        self.create_server = Some(adapter);
        self
    }

    pub fn with_fetch(mut self, fetch: Arc<dyn Fetch>) -> Self {
        self.fetch = Some(fetch);
        self
    }
}

impl fmt::Debug for SentaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentaConfig")
            .field("server", &self.server)
            .field("create_server", &self.create_server.is_some())
            .field("fetch", &self.fetch.is_some())
            .finish()
    }
}
