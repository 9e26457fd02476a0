//! Connection hub implementation
//!
//! Maps connection identifiers to per-connection outbound channels. The
//! socket task for each connection drains its channel and writes frames;
//! the hub never blocks on a slow connection.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::RwLock;

use crate::protocol::ServerMessage;
use crate::registry::ConnectionId;

/// Addressable message delivery over the live set of connections
///
/// The lock is held only for map access; sends go into unbounded channels
/// and cannot block the caller.
pub struct ConnectionHub {
    peers: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>>,
}

impl ConnectionHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
        }
    }

    /// Attach a connection's outbound channel
    pub async fn attach(&self, id: ConnectionId, tx: mpsc::UnboundedSender<ServerMessage>) {
        let mut peers = self.peers.write().await;
        peers.insert(id, tx);
    }

    /// Detach a connection's outbound channel
    pub async fn detach(&self, id: &ConnectionId) {
        let mut peers = self.peers.write().await;
        peers.remove(id);
    }

    /// Deliver a message to one connection
    ///
    /// Returns `false` when the target is unknown or its channel has
    /// closed; the message is dropped, never queued or retried.
    pub async fn send_to(&self, id: &ConnectionId, message: ServerMessage) -> bool {
        let peers = self.peers.read().await;

        match peers.get(id) {
            Some(tx) => match tx.send(message) {
                Ok(()) => true,
                Err(_) => {
                    tracing::debug!(connection = %id, "Dropped message for closed channel");
                    false
                }
            },
            None => {
                tracing::debug!(connection = %id, "Dropped message for unknown connection");
                false
            }
        }
    }

    /// Deliver a message to every connected transport
    ///
    /// Returns the number of connections the message was handed to.
    pub async fn broadcast_all(&self, message: ServerMessage) -> usize {
        let peers = self.peers.read().await;
        let mut delivered = 0;

        for (id, tx) in peers.iter() {
            if tx.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(connection = %id, "Dropped broadcast for closed channel");
            }
        }

        delivered
    }

    /// Number of attached connections
    pub async fn peer_count(&self) -> usize {
        self.peers.read().await.len()
    }
}

impl Default for ConnectionHub {
    fn default() -> Self {
        Self::new()
    }
}
