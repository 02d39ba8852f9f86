//! Per-connection request lifecycle state.

use crate::parser::HttpRequest;

/// Where a connection is in the request lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConnectionState {
    /// No request pending; the next message must be a request head.
    #[default]
    Idle,
    /// A chunked request head arrived; its body chunks are being collected.
    AwaitingBody {
        /// The request to dispatch once the terminating chunk arrives.
        pending: HttpRequest,
    },
}

impl ConnectionState {
    /// Check whether a chunked body is in flight.
    pub fn is_receiving_chunks(&self) -> bool {
        matches!(self, ConnectionState::AwaitingBody { .. })
    }

    /// The request whose body is still arriving, if any.
    pub fn current_request(&self) -> Option<&HttpRequest> {
        match self {
            ConnectionState::Idle => None,
            ConnectionState::AwaitingBody { pending } => Some(pending),
        }
    }
}
