//! Configuration module for Netstream
//!
//! JSON configuration covering the tunables this layer exposes: the
//! listen backlog and the client TLS settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::transport::DEFAULT_BACKLOG;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Transport layer configuration
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Transport layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Accept-queue capacity for listening sockets
    #[serde(default = "default_backlog")]
    pub backlog: u32,

    /// TLS settings for secure client schemes
    #[serde(default)]
    pub tls: TlsSettings,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            backlog: DEFAULT_BACKLOG,
            tls: TlsSettings::default(),
        }
    }
}

fn default_backlog() -> u32 {
    DEFAULT_BACKLOG
}

/// TLS settings for the secure client path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlsSettings {
    /// Server name for SNI (defaults to the endpoint host)
    #[serde(default)]
    pub server_name: Option<String>,

    /// Allow insecure certificates
    #[serde(default)]
    pub allow_insecure: bool,

    /// ALPN protocols
    #[serde(default)]
    pub alpn: Vec<String>,

    /// Extra CA bundle to trust, as a PEM file
    #[serde(default)]
    pub ca_file: Option<String>,
}
