//! The outbound side of a connection.

use crate::server::HttpResponse;

/// Sink for everything a handler sends back on its connection.
pub trait ResponseChannel {
    /// Queue a response for the client.
    fn write_response(&mut self, response: HttpResponse);

    /// Close the connection. Nothing is written after this.
    fn close(&mut self);
}

/// An action the transport must carry out on the socket.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Response(HttpResponse),
    Close,
}

/// Records outbound actions in order so the transport can flush them.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    actions: Vec<Outbound>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued actions, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.actions)
    }

    pub fn actions(&self) -> &[Outbound] {
        &self.actions
    }

    /// Responses queued so far, in order.
    pub fn responses(&self) -> impl Iterator<Item = &HttpResponse> {
        self.actions.iter().filter_map(|action| match action {
            Outbound::Response(response) => Some(response),
            Outbound::Close => None,
        })
    }

    /// How many times the connection was asked to close.
    pub fn close_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| matches!(action, Outbound::Close))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl ResponseChannel for OutboundQueue {
    fn write_response(&mut self, response: HttpResponse) {
        self.actions.push(Outbound::Response(response));
    }

    fn close(&mut self) {
        self.actions.push(Outbound::Close);
    }
}
