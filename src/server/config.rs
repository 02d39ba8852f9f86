//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

use crate::server::error::Error;

/// Admin server configuration.
///
/// Can be built in code or loaded from JSON; fields missing from the JSON
/// document take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// The largest request head (or chunk size line) accepted.
    pub max_head_size: usize,
    /// The largest request body accepted, declared or chunked.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_head_size: 16 * 1024,
            max_body_size: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: ServerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_connections == 0 {
            return Err(Error::InvalidConfig("max_connections must be positive".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(Error::InvalidConfig("read_buffer_size must be positive".to_string()));
        }
        if self.max_head_size == 0 {
            return Err(Error::InvalidConfig("max_head_size must be positive".to_string()));
        }
        if self.max_body_size == 0 {
            return Err(Error::InvalidConfig("max_body_size must be positive".to_string()));
        }
        Ok(())
    }
}
