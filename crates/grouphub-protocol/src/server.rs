//! The TCP server loop.
//!
//! One task per connection. Each connection is a sequence of independent
//! request/response line pairs; there is no per-connection state beyond the
//! socket itself, so the store stays the sole synchronization point.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

use grouphub_core::AppResult;
use grouphub_core::config::ServerConfig;

use crate::dispatcher::Dispatcher;
use crate::response::Response;

/// Serves the line-oriented JSON protocol over TCP.
pub struct ProtocolServer {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl ProtocolServer {
    /// Creates a new protocol server.
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Accept connections until the shutdown signal fires, then stop
    /// accepting. In-flight connections notice the signal on their next
    /// request boundary.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> AppResult<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        info!(%addr, "Listening");

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!(%peer, "Connection accepted");
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let max_line_bytes = self.config.max_line_bytes;
                            let shutdown = shutdown.clone();
                            tokio::spawn(async move {
                                if let Err(e) =
                                    serve_connection(stream, dispatcher, max_line_bytes, shutdown)
                                        .await
                                {
                                    warn!(%peer, error = %e, "Connection ended with error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Accept failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Shutdown signal received, no longer accepting connections");
                        return Ok(());
                    }
                }
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    dispatcher: Arc<Dispatcher>,
    max_line_bytes: usize,
    mut shutdown: watch::Receiver<bool>,
) -> AppResult<()> {
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(max_line_bytes));

    loop {
        let line = tokio::select! {
            line = framed.next() => line,
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    return Ok(());
                }
                continue;
            }
        };

        match line {
            Some(Ok(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let response = dispatcher.dispatch_line(&line).await;
                send_response(&mut framed, &response).await?;
            }
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                // The rest of the oversized line is unrecoverable; answer
                // and drop the connection.
                let response = Response::invalid("Request line too long");
                send_response(&mut framed, &response).await?;
                return Ok(());
            }
            Some(Err(LinesCodecError::Io(e))) => return Err(e.into()),
            None => return Ok(()),
        }
    }
}

async fn send_response(
    framed: &mut Framed<TcpStream, LinesCodec>,
    response: &Response,
) -> AppResult<()> {
    let encoded = serde_json::to_string(response)?;
    framed.send(encoded).await.map_err(|e| match e {
        LinesCodecError::Io(io) => io.into(),
        LinesCodecError::MaxLineLengthExceeded => {
            grouphub_core::AppError::internal("Response exceeded line limit")
        }
    })?;
    Ok(())
}
