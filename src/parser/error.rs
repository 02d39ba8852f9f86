//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while parsing or framing an HTTP request.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP method token is empty or contains invalid characters.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The request path is invalid or missing.
    #[error("Invalid HTTP path")]
    InvalidPath,

    /// The request line is malformed (wrong format or missing components).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The HTTP version in the request is not supported.
    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// A required header is missing from the request.
    #[error("Required header is missing: {0}")]
    MissingHeader(String),

    /// A header in the request has an invalid format.
    #[error("Invalid header format")]
    InvalidHeaderFormat,

    /// The request is empty.
    #[error("Empty request")]
    EmptyRequest,

    /// The request head grew past the configured limit without terminating.
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// The request body is larger than the configured limit.
    #[error("Request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// The Content-Length header is not a valid length.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// A chunk of a chunked body is malformed.
    #[error("Invalid chunk: {0}")]
    InvalidChunk(String),
}
