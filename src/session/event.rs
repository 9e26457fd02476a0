//! Transport events
//!
//! The socket layer translates connection activity into this enum and
//! hands each value to the lifecycle manager; relay behavior is defined
//! entirely in terms of these three events.

use crate::protocol::ClientMessage;
use crate::registry::ConnectionId;

/// A transport-level event for one connection
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A transport session was established
    Connect(ConnectionId),
    /// The connection sent a protocol message
    Message(ConnectionId, ClientMessage),
    /// The transport session ended
    Disconnect(ConnectionId),
}

impl TransportEvent {
    /// Identifier of the connection the event belongs to
    pub fn connection(&self) -> &ConnectionId {
        match self {
            TransportEvent::Connect(id) => id,
            TransportEvent::Message(id, _) => id,
            TransportEvent::Disconnect(id) => id,
        }
    }
}
