//! Per-connection WebSocket plumbing
//!
//! Performs the WebSocket handshake, attaches the connection to the hub,
//! and pumps frames in both directions: outbound relay messages are
//! serialized to JSON text frames, inbound text frames are parsed into
//! protocol messages and handed to the lifecycle manager one at a time.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use crate::error::{Error, Result};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::registry::ConnectionId;
use crate::server::config::ServerConfig;
use crate::session::{SessionLifecycle, TransportEvent};
use crate::transport::ConnectionHub;

/// One accepted transport session
pub(super) struct Connection {
    id: ConnectionId,
    peer_addr: SocketAddr,
    config: ServerConfig,
    lifecycle: Arc<SessionLifecycle>,
    hub: Arc<ConnectionHub>,
}

impl Connection {
    pub(super) fn new(
        id: ConnectionId,
        peer_addr: SocketAddr,
        config: ServerConfig,
        lifecycle: Arc<SessionLifecycle>,
        hub: Arc<ConnectionHub>,
    ) -> Self {
        Self {
            id,
            peer_addr,
            config,
            lifecycle,
            hub,
        }
    }

    /// Drive the connection until the peer goes away
    ///
    /// Once the session is established, the disconnect event is emitted on
    /// every exit path, so registry cleanup and leave notifications happen
    /// even when the socket fails mid-session.
    pub(super) async fn run(self, socket: TcpStream) -> Result<()> {
        let ws = tokio::time::timeout(self.config.handshake_timeout, accept_async(socket))
            .await
            .map_err(|_| Error::HandshakeTimeout)??;

        tracing::debug!(
            connection = %self.id,
            peer = %self.peer_addr,
            "WebSocket handshake complete"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        self.hub.attach(self.id.clone(), tx).await;
        self.lifecycle
            .handle_event(TransportEvent::Connect(self.id.clone()))
            .await;

        let result = self.pump(ws, rx).await;

        self.hub.detach(&self.id).await;
        self.lifecycle
            .handle_event(TransportEvent::Disconnect(self.id.clone()))
            .await;

        result
    }

    async fn pump(
        &self,
        ws: tokio_tungstenite::WebSocketStream<TcpStream>,
        mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    ) -> Result<()> {
        let (mut sink, mut stream) = ws.split();

        loop {
            tokio::select! {
                outbound = rx.recv() => {
                    match outbound {
                        Some(message) => {
                            tracing::trace!(
                                connection = %self.id,
                                kind = message.kind(),
                                "Message sent"
                            );
                            let json = message.to_json()?;
                            sink.send(Message::text(json)).await?;
                        }
                        // Hub dropped our channel
                        None => break,
                    }
                }
                frame = stream.next() => {
                    match frame {
                        Some(Ok(frame)) => {
                            if frame.is_text() {
                                let text = frame.into_text()?;
                                self.dispatch(text.as_str()).await;
                            } else if frame.is_close() {
                                break;
                            }
                            // Ping/pong are answered by the protocol layer;
                            // binary frames are not part of the protocol
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => break,
                    }
                }
            }
        }

        Ok(())
    }

    /// Parse one inbound text frame and hand it to the lifecycle manager
    ///
    /// Frames that do not parse are dropped; the sender is never told.
    async fn dispatch(&self, text: &str) {
        match ClientMessage::from_json(text) {
            Ok(message) => {
                tracing::trace!(
                    connection = %self.id,
                    kind = message.kind(),
                    "Message received"
                );
                self.lifecycle
                    .handle_event(TransportEvent::Message(self.id.clone(), message))
                    .await;
            }
            Err(e) => {
                tracing::debug!(
                    connection = %self.id,
                    error = %e,
                    "Dropped malformed message"
                );
            }
        }
    }
}
