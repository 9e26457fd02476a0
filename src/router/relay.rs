//! Router implementation
//!
//! A payload with an empty target, or whose target has departed, is
//! dropped with a debug log; nothing is surfaced to the sender.

use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::registry::ConnectionId;
use crate::stats::RelayStats;
use crate::transport::ConnectionHub;

/// Routes negotiation payloads between peers
pub struct MessageRouter {
    hub: Arc<ConnectionHub>,
    stats: Arc<RelayStats>,
}

impl MessageRouter {
    /// Create a router delivering through the given hub
    pub fn new(hub: Arc<ConnectionHub>, stats: Arc<RelayStats>) -> Self {
        Self { hub, stats }
    }

    /// Forward a relay payload to its target, tagged with the sender
    ///
    /// `offer` and `answer` bodies are forwarded as `{from, sdp}`,
    /// `ice-candidate` bodies as `{from, candidate}`. Non-relay messages
    /// are ignored.
    pub async fn relay(&self, from: &ConnectionId, message: ClientMessage) {
        let kind = message.kind();

        let (to, forwarded) = match message {
            ClientMessage::Offer { to, sdp } => (
                to,
                ServerMessage::Offer {
                    from: from.clone(),
                    sdp,
                },
            ),
            ClientMessage::Answer { to, sdp } => (
                to,
                ServerMessage::Answer {
                    from: from.clone(),
                    sdp,
                },
            ),
            ClientMessage::IceCandidate { to, candidate } => (
                to,
                ServerMessage::IceCandidate {
                    from: from.clone(),
                    candidate,
                },
            ),
            ClientMessage::Register { .. } => {
                tracing::debug!(connection = %from, "Register message is not routable");
                return;
            }
        };

        if to.is_empty() {
            tracing::debug!(connection = %from, kind = kind, "Dropped payload without target");
            self.stats.message_dropped();
            return;
        }

        if self.hub.send_to(&to, forwarded).await {
            tracing::trace!(from = %from, to = %to, kind = kind, "Payload relayed");
            self.stats.message_relayed();
        } else {
            self.stats.message_dropped();
        }
    }
}
