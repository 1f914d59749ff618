//! Command server configuration.

use serde::{Deserialize, Serialize};

/// Line-oriented JSON command server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted line length in bytes; longer requests are rejected.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_line_bytes: default_max_line_bytes(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5500
}

fn default_max_line_bytes() -> usize {
    64 * 1024
}

fn default_shutdown_grace() -> u64 {
    30
}
