//! Structured error responses.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;

use crate::admin::channel::ResponseChannel;
use crate::server::{HttpResponse, StatusCode};

/// Writes an error response for a status and message.
pub trait ErrorResponder {
    fn write_error_response(&self, channel: &mut dyn ResponseChannel, status: StatusCode, message: &str);
}

impl<T: ErrorResponder + ?Sized> ErrorResponder for Arc<T> {
    fn write_error_response(&self, channel: &mut dyn ResponseChannel, status: StatusCode, message: &str) {
        (**self).write_error_response(channel, status, message)
    }
}

/// Body format used by [`RestErrorResponder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorFormat {
    /// `text/plain` body holding the message.
    #[default]
    PlainText,
    /// `application/json` body: `{"status":400,"error":"Bad Request","message":"..."}`.
    Json,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: u16,
    error: &'a str,
    message: &'a str,
}

/// Default [`ErrorResponder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RestErrorResponder {
    format: ErrorFormat,
}

impl RestErrorResponder {
    pub fn new(format: ErrorFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ErrorFormat {
        self.format
    }

    fn plain_text(status: StatusCode, message: &str) -> HttpResponse {
        HttpResponse::new(status)
            .with_content_type("text/plain")
            .with_body_string(message)
    }

    fn build(&self, status: StatusCode, message: &str) -> HttpResponse {
        match self.format {
            ErrorFormat::PlainText => Self::plain_text(status, message),
            ErrorFormat::Json => {
                let body = ErrorBody {
                    status: status.as_u16(),
                    error: status.reason_phrase(),
                    message,
                };
                HttpResponse::new(status).with_json(&body).unwrap_or_else(|e| {
                    warn!("Falling back to a plain text error body: {e}");
                    Self::plain_text(status, message)
                })
            }
        }
    }
}

impl ErrorResponder for RestErrorResponder {
    fn write_error_response(&self, channel: &mut dyn ResponseChannel, status: StatusCode, message: &str) {
        debug!("Writing {} error response: {message}", status.as_u16());
        channel.write_response(self.build(status, message));
    }
}
