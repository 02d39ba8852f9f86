//! Coordinator admin request handling.
//!
//! [`CoordinatorAdminHandler`] is bound to one connection. It is fed the
//! messages framed by the transport, tracks whether a chunked body is in
//! flight, dispatches completed requests by method and writes exactly one
//! response per request through a [`ResponseChannel`].
//!
//! | Method  | Response                                    |
//! |---------|---------------------------------------------|
//! | GET     | 200, body is the current configuration text |
//! | POST    | 404                                         |
//! | DELETE  | 400                                         |
//! | other   | 400 through the [`ErrorResponder`]          |

mod channel;
mod config_provider;
mod error;
mod error_responder;
mod handler;
mod state;
mod tests;

pub use channel::{Outbound, OutboundQueue, ResponseChannel};
pub use config_provider::{ConfigProvider, FileConfigProvider, StaticConfigProvider};
pub use error::{ConfigError, TransportError};
pub use error_responder::{ErrorFormat, ErrorResponder, RestErrorResponder};
pub use handler::{build_response, CoordinatorAdminHandler};
pub use state::ConnectionState;
