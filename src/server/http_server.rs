//! Admin HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use log::{debug, error, info, warn};

use crate::admin::{
    ConfigProvider, CoordinatorAdminHandler, ErrorResponder, Outbound, OutboundQueue, TransportError,
};
use crate::parser::RequestDecoder;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

/// Serves the coordinator admin endpoint.
///
/// Every accepted connection gets its own [`CoordinatorAdminHandler`]
/// sharing the server's config provider and error responder.
pub struct AdminServer<C, E> {
    /// The server configuration.
    pub config: ServerConfig,
    config_provider: Arc<C>,
    error_responder: Arc<E>,
}

impl<C, E> AdminServer<C, E>
where
    C: ConfigProvider + Send + Sync + 'static,
    E: ErrorResponder + Send + Sync + 'static,
{
    /// Create a new admin server with the given configuration and collaborators.
    pub fn new(config: ServerConfig, config_provider: C, error_responder: E) -> Self {
        Self {
            config,
            config_provider: Arc::new(config_provider),
            error_responder: Arc::new(error_responder),
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Admin server listening on http://{addr}", addr = self.config.addr);
        Ok(listener)
    }

    /// Start the server and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        self.config.validate()?;
        let listener = self.setup_listener().await?;

        self.serve(listener, async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => error!("Error setting up Ctrl+C handler: {e}"),
            }
        })
        .await
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    pub async fn serve(&self, listener: TcpListener, shutdown: impl Future<Output = ()>) -> Result<(), Error> {
        info!("Serving admin endpoint: GET (configs), POST, DELETE");

        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down admin server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            self.handle_new_connection(socket, addr, semaphore.clone(), &mut tasks).await;
                        }
                        Err(e) => {
                            if Self::handle_accept_error(e).await {
                                break;
                            }
                        }
                    }
                }

                // Reap finished connections so the set does not grow unbounded
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Handle a new connection.
    async fn handle_new_connection(
        &self,
        mut socket: tokio::net::TcpStream,
        addr: SocketAddr,
        semaphore: Arc<Semaphore>,
        tasks: &mut JoinSet<()>,
    ) {
        let permit = match semaphore.try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                    .with_content_type("text/plain")
                    .with_body_string("Server is at capacity, please try again later");
                let _ = socket.write_all(&response.to_bytes()).await;
                return;
            }
        };

        let mut handler = CoordinatorAdminHandler::new(
            Arc::clone(&self.config_provider),
            Arc::clone(&self.error_responder),
        );
        let config = self.config.clone();

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the semaphore slot
            let _permit = permit;
            debug!("Accepted admin connection from {addr}");

            if let Err(e) = handle_connection(&mut socket, &mut handler, &config).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Handle accept errors.
    async fn handle_accept_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        false
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let drained = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("Aborting {len} connections still open after {shutdown_timeout:?}", len = tasks.len());
            tasks.abort_all();
        }

        info!("Admin server shutdown complete");
    }
}

/// Whether the connection is still usable after a flush.
#[derive(Debug, PartialEq, Eq)]
enum FlushOutcome {
    Open,
    Closed,
}

/// Write out everything the handler queued, stopping at a close.
async fn flush(
    socket: &mut (impl AsyncWrite + Unpin),
    queue: &mut OutboundQueue,
) -> Result<FlushOutcome, Error> {
    for action in queue.drain() {
        match action {
            Outbound::Response(response) => {
                socket.write_all(&response.to_bytes()).await?;
            }
            Outbound::Close => {
                socket.flush().await?;
                // The peer may already be gone
                if let Err(e) = socket.shutdown().await {
                    debug!("Error shutting down socket: {e}");
                }
                return Ok(FlushOutcome::Closed);
            }
        }
    }
    socket.flush().await?;
    Ok(FlushOutcome::Open)
}

/// Drive a single connection until the peer hangs up or the handler closes it.
///
/// Bytes read from `socket` are framed by a [`RequestDecoder`] and fed to
/// `handler` one message at a time; queued responses are written back after
/// each message. Read and framing failures are reported to the handler,
/// which closes the connection, and then returned.
pub async fn handle_connection<C, E>(
    socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
    handler: &mut CoordinatorAdminHandler<C, E>,
    config: &ServerConfig,
) -> Result<(), Error>
where
    C: ConfigProvider,
    E: ErrorResponder,
{
    let mut decoder = RequestDecoder::new(config.max_head_size, config.max_body_size);
    let mut queue = OutboundQueue::new();
    let mut pending = Vec::with_capacity(config.read_buffer_size);
    let mut read_buf = vec![0; config.read_buffer_size];

    loop {
        loop {
            match decoder.decode(&mut pending) {
                Ok(Some(message)) => {
                    handler.on_message(message, &mut queue);
                    if flush(&mut *socket, &mut queue).await? == FlushOutcome::Closed {
                        return Ok(());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let error = TransportError::from(e);
                    handler.on_transport_error(&error, &mut queue);
                    flush(&mut *socket, &mut queue).await?;
                    return Err(Error::ConnectionClosed(error));
                }
            }
        }

        let n = match socket.read(&mut read_buf).await {
            Ok(n) => n,
            Err(e) => {
                let error = TransportError::from(e);
                handler.on_transport_error(&error, &mut queue);
                // Best effort, the socket already failed
                let _ = flush(&mut *socket, &mut queue).await;
                return Err(Error::ConnectionClosed(error));
            }
        };
        if n == 0 {
            if handler.state().is_receiving_chunks() {
                debug!("Peer closed the connection mid-way through a chunked body");
            }
            return Ok(());
        }
        pending.extend_from_slice(&read_buf[..n]);
    }
}
