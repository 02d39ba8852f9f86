//! HTTP server for the coordinator admin endpoint.
//!
//! This module plays the transport role for [`crate::admin`]: it accepts
//! connections, frames their bytes into messages, feeds them to one
//! handler per connection and writes the handler's responses back.

mod response;
mod config;
mod error;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use http_server::{handle_connection, AdminServer};
