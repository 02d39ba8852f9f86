//! Error types for the admin handler and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::Error as ParserError;

/// A failure surfacing from the transport underneath a connection.
///
/// Always fatal for that connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading from or writing to the socket failed.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The byte stream could not be framed into requests.
    #[error("Malformed request stream: {0}")]
    Framing(#[from] ParserError),
}

/// Errors returned by a [`ConfigProvider`](crate::admin::ConfigProvider).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration source could not be read.
    #[error("Failed to read configuration from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is temporarily not available.
    #[error("Configuration unavailable: {0}")]
    Unavailable(String),
}
