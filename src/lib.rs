//! Administrative HTTP endpoint for a store coordinator.
//!
//! Each connection is served by a [`CoordinatorAdminHandler`] that reassembles
//! chunked requests, dispatches completed ones by method and writes exactly
//! one response per request:
//!
//! - `GET` returns the current store client configuration (200)
//! - `POST` and `DELETE` are placeholders answering 404 and 400
//! - any other method gets a 400 from the [`ErrorResponder`]
//!
//! Transport failures close the connection without a response.
//!
//! # Examples
//!
//! ## Driving a handler directly
//!
//! ```
//! use coordinator_admin::{
//!     parse_request, CoordinatorAdminHandler, InboundMessage, OutboundQueue,
//!     RestErrorResponder, StaticConfigProvider, StatusCode,
//! };
//!
//! let mut handler = CoordinatorAdminHandler::new(
//!     StaticConfigProvider::new("<stores/>"),
//!     RestErrorResponder::default(),
//! );
//! let mut queue = OutboundQueue::new();
//!
//! let request = parse_request(b"GET /admin HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
//! handler.on_message(InboundMessage::Request(request), &mut queue);
//!
//! let response = queue.responses().next().unwrap();
//! assert_eq!(response.status, StatusCode::Ok);
//! assert_eq!(response.body, b"<stores/>");
//! ```
//!
//! ## Running the server
//!
//! ```no_run
//! use coordinator_admin::{AdminServer, FileConfigProvider, RestErrorResponder, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), coordinator_admin::ServerError> {
//!     coordinator_admin::logging::init();
//!     let server = AdminServer::new(
//!         ServerConfig::default(),
//!         FileConfigProvider::new("config/clients.xml"),
//!         RestErrorResponder::default(),
//!     );
//!     server.start().await
//! }
//! ```

// Export the parser module
pub mod parser;

// Export the admin request handling module
pub mod admin;

// Export the server module
pub mod server;

pub mod logging;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpChunk, HttpRequest, HttpVersion, InboundMessage, Method, RequestDecoder, parse_request};
pub use admin::{
    ConfigError, ConfigProvider, ConnectionState, CoordinatorAdminHandler, ErrorFormat, ErrorResponder,
    FileConfigProvider, OutboundQueue, ResponseChannel, RestErrorResponder, StaticConfigProvider, TransportError,
};
pub use server::{AdminServer, Error as ServerError, HttpResponse, ServerConfig, StatusCode};
