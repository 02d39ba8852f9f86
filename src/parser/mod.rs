//! HTTP parser module.
//!
//! This module parses HTTP/1.x request heads and frames a connection's byte
//! stream into request and body-chunk messages.

mod request;
mod method;
mod version;
mod error;
mod chunk;
mod decoder;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;
pub use chunk::HttpChunk;
pub use decoder::{InboundMessage, RequestDecoder};

// Re-export the parse_request function
pub use request::parse_request;
