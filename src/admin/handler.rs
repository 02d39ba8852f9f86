//! Request lifecycle for the coordinator admin endpoint.

use log::{debug, error, info};

use crate::admin::channel::ResponseChannel;
use crate::admin::config_provider::ConfigProvider;
use crate::admin::error::{ConfigError, TransportError};
use crate::admin::error_responder::ErrorResponder;
use crate::admin::state::ConnectionState;
use crate::parser::{HttpRequest, InboundMessage, Method};
use crate::server::{HttpResponse, StatusCode};

const PUT_BODY: &str = "GOT A PUT";
const DELETE_BODY: &str = "GOT A DELETE";

/// Handles the admin requests arriving on a single connection.
///
/// Each connection owns one handler. Messages must be fed in arrival order;
/// a completed request produces exactly one response, either a regular one
/// or one written by the [`ErrorResponder`].
pub struct CoordinatorAdminHandler<C, E> {
    config_provider: C,
    error_responder: E,
    state: ConnectionState,
}

impl<C: ConfigProvider, E: ErrorResponder> CoordinatorAdminHandler<C, E> {
    pub fn new(config_provider: C, error_responder: E) -> Self {
        Self {
            config_provider,
            error_responder,
            state: ConnectionState::Idle,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// React to one message from the transport.
    ///
    /// A chunk while idle, or a request head while a chunked body is still
    /// arriving, cannot be recovered from: the connection is closed.
    pub fn on_message(&mut self, message: InboundMessage, channel: &mut dyn ResponseChannel) {
        self.state = match (std::mem::take(&mut self.state), message) {
            (ConnectionState::Idle, InboundMessage::Request(request)) => {
                debug!("Request URI: {}", request.path);
                if request.is_chunked() {
                    ConnectionState::AwaitingBody { pending: request }
                } else {
                    self.dispatch(request, channel);
                    ConnectionState::Idle
                }
            }
            // Chunk payloads are discarded; no route reads the request body.
            (ConnectionState::AwaitingBody { pending }, InboundMessage::Chunk(chunk)) => {
                if chunk.is_last {
                    debug!("Received last chunk for {}", pending.path);
                    self.dispatch(pending, channel);
                    ConnectionState::Idle
                } else {
                    ConnectionState::AwaitingBody { pending }
                }
            }
            (ConnectionState::Idle, InboundMessage::Chunk(_)) => {
                error!("Received a body chunk with no request in progress, closing connection");
                channel.close();
                ConnectionState::Idle
            }
            (ConnectionState::AwaitingBody { pending }, InboundMessage::Request(request)) => {
                error!(
                    "Received {} {} before the chunked body of {} {} completed, closing connection",
                    request.method, request.path, pending.method, pending.path
                );
                channel.close();
                ConnectionState::Idle
            }
        };
    }

    /// Log a transport failure and close the connection.
    pub fn on_transport_error(&mut self, error: &TransportError, channel: &mut dyn ResponseChannel) {
        error!("Transport failure, closing connection: {error}");
        self.state = ConnectionState::Idle;
        channel.close();
    }

    fn dispatch(&self, request: HttpRequest, channel: &mut dyn ResponseChannel) {
        let response = match request.method {
            Method::GET => {
                debug!("Received a Http GET request for {}", request.path);
                self.handle_get()
            }
            Method::POST => {
                debug!("Received a Http POST request for {}", request.path);
                Ok(self.handle_put())
            }
            Method::DELETE => {
                debug!("Received a Http DELETE request for {}", request.path);
                Ok(self.handle_delete())
            }
            Method::PUT | Method::HEAD | Method::OPTIONS | Method::PATCH | Method::Other(_) => {
                let message = format!("Illegal Http request received: {} {}", request.method, request.path);
                error!("{message}");
                self.error_responder
                    .write_error_response(channel, StatusCode::BadRequest, &message);
                return;
            }
        };

        match response {
            Ok(response) => channel.write_response(response),
            Err(e) => {
                error!("Failed to retrieve store client configs: {e}");
                let message = format!("Failed to retrieve configuration: {e}");
                self.error_responder
                    .write_error_response(channel, StatusCode::InternalServerError, &message);
            }
        }
    }

    fn handle_get(&self) -> Result<HttpResponse, ConfigError> {
        let configs = self.config_provider.get_all_configs()?;
        Ok(build_response(StatusCode::Ok, &configs))
    }

    // Administrative updates are not supported; POST always answers 404.
    fn handle_put(&self) -> HttpResponse {
        build_response(StatusCode::NotFound, PUT_BODY)
    }

    fn handle_delete(&self) -> HttpResponse {
        build_response(StatusCode::BadRequest, DELETE_BODY)
    }
}

/// Build a response carrying `body` with a matching Content-Length.
pub fn build_response(status: StatusCode, body: &str) -> HttpResponse {
    let response = HttpResponse::new(status).with_body_string(body);
    info!("Sent {} {} ({} bytes)", response.status.as_u16(), response.status.reason_phrase(), response.body.len());
    response
}
