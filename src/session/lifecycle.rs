//! Lifecycle manager implementation
//!
//! One synchronous-in-effect dispatch point for all transport events. The
//! registry decides admissions and departures atomically; this module
//! turns those decisions into protocol notifications.

use std::sync::Arc;

use super::event::TransportEvent;
use crate::protocol::{ClientMessage, Role, ServerMessage};
use crate::registry::{Admission, ConnectionId, ConnectionRegistry};
use crate::router::MessageRouter;
use crate::stats::RelayStats;
use crate::transport::ConnectionHub;

/// Drives the relay's per-connection state machine
///
/// `unassigned → streamer | viewer → closed`; there is no transition back
/// to `unassigned` and no role reassignment. All error-like outcomes are
/// ordinary protocol messages, never failures.
pub struct SessionLifecycle {
    registry: Arc<ConnectionRegistry>,
    hub: Arc<ConnectionHub>,
    router: MessageRouter,
    stats: Arc<RelayStats>,
}

impl SessionLifecycle {
    /// Create a lifecycle manager over the given registry and hub
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        hub: Arc<ConnectionHub>,
        stats: Arc<RelayStats>,
    ) -> Self {
        let router = MessageRouter::new(Arc::clone(&hub), Arc::clone(&stats));

        Self {
            registry,
            hub,
            router,
            stats,
        }
    }

    /// Handle one transport event to completion
    pub async fn handle_event(&self, event: TransportEvent) {
        tracing::trace!(connection = %event.connection(), "Handling transport event");

        match event {
            TransportEvent::Connect(id) => self.on_connect(id).await,
            TransportEvent::Message(id, ClientMessage::Register { role }) => {
                self.on_register(id, role).await
            }
            TransportEvent::Message(id, message) => self.router.relay(&id, message).await,
            TransportEvent::Disconnect(id) => self.on_disconnect(id).await,
        }
    }

    async fn on_connect(&self, id: ConnectionId) {
        self.registry.insert(id.clone()).await;
        self.stats.connection_opened();

        tracing::info!(connection = %id, "Connection established");
    }

    async fn on_register(&self, id: ConnectionId, role: Role) {
        match self.registry.register(&id, role).await {
            Ok(Admission::Streamer) => {
                self.stats.registration_accepted();
                self.hub.send_to(&id, ServerMessage::StreamerAccepted).await;
            }
            Ok(Admission::Viewer {
                streamer: Some(streamer),
            }) => {
                self.stats.registration_accepted();
                self.hub
                    .send_to(&streamer, ServerMessage::ViewerJoined { viewer_id: id })
                    .await;
            }
            Ok(Admission::Viewer { streamer: None }) => {
                self.stats.registration_accepted();
                self.hub.send_to(&id, ServerMessage::NoStreamer).await;
            }
            Err(err) => {
                self.stats.registration_rejected();
                tracing::info!(
                    connection = %id,
                    requested = ?role,
                    error = %err,
                    "Registration rejected"
                );

                // Only streamer requests have a rejection message on the wire
                if role == Role::Streamer {
                    self.hub
                        .send_to(
                            &id,
                            ServerMessage::StreamerRejected {
                                reason: err.reason().to_string(),
                            },
                        )
                        .await;
                }
            }
        }
    }

    async fn on_disconnect(&self, id: ConnectionId) {
        let departure = self.registry.remove(&id).await;

        if departure.role.is_none() {
            // Unknown identifier; nothing was connected
            return;
        }

        self.stats.connection_closed();
        tracing::info!(connection = %id, "Connection closed");

        if departure.was_streamer {
            let notified = self.hub.broadcast_all(ServerMessage::StreamerStopped).await;
            tracing::info!(connection = %id, notified = notified, "Streamer stopped");
        } else if let Some(streamer) = departure.streamer {
            // Viewers and never-registered connections alike
            self.hub
                .send_to(&streamer, ServerMessage::ViewerLeft { viewer_id: id })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    struct Relay {
        lifecycle: SessionLifecycle,
        hub: Arc<ConnectionHub>,
        registry: Arc<ConnectionRegistry>,
        stats: Arc<RelayStats>,
    }

    fn relay() -> Relay {
        let registry = Arc::new(ConnectionRegistry::new());
        let hub = Arc::new(ConnectionHub::new());
        let stats = Arc::new(RelayStats::new());
        let lifecycle =
            SessionLifecycle::new(Arc::clone(&registry), Arc::clone(&hub), Arc::clone(&stats));

        Relay {
            lifecycle,
            hub,
            registry,
            stats,
        }
    }

    impl Relay {
        /// Simulate a transport connect: attach an outbound channel and
        /// deliver the connect event, as the socket layer does.
        async fn connect(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<ServerMessage>) {
            let id = ConnectionId::new(id);
            let (tx, rx) = mpsc::unbounded_channel();
            self.hub.attach(id.clone(), tx).await;
            self.lifecycle
                .handle_event(TransportEvent::Connect(id.clone()))
                .await;
            (id, rx)
        }

        async fn disconnect(&self, id: &ConnectionId) {
            self.hub.detach(id).await;
            self.lifecycle
                .handle_event(TransportEvent::Disconnect(id.clone()))
                .await;
        }

        async fn register(&self, id: &ConnectionId, role: Role) {
            self.lifecycle
                .handle_event(TransportEvent::Message(
                    id.clone(),
                    ClientMessage::Register { role },
                ))
                .await;
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    #[tokio::test]
    async fn test_streamer_registration_accepted() {
        let relay = relay();
        let (streamer, mut rx) = relay.connect("s1").await;

        relay.register(&streamer, Role::Streamer).await;

        assert_eq!(drain(&mut rx), vec![ServerMessage::StreamerAccepted]);
        assert_eq!(relay.registry.current_streamer().await, Some(streamer));
    }

    #[tokio::test]
    async fn test_second_streamer_rejected() {
        let relay = relay();
        let (first, mut first_rx) = relay.connect("s1").await;
        let (second, mut second_rx) = relay.connect("s2").await;

        relay.register(&first, Role::Streamer).await;
        drain(&mut first_rx);

        relay.register(&second, Role::Streamer).await;

        assert_eq!(
            drain(&mut second_rx),
            vec![ServerMessage::StreamerRejected {
                reason: "A streamer is already active".into(),
            }]
        );
        // Existing streamer untouched and not notified
        assert!(drain(&mut first_rx).is_empty());
        assert_eq!(relay.registry.current_streamer().await, Some(first));
        assert_eq!(relay.stats.snapshot().registrations_rejected, 1);
    }

    #[tokio::test]
    async fn test_streamer_reregister_accepted_again() {
        let relay = relay();
        let (streamer, mut rx) = relay.connect("s1").await;

        relay.register(&streamer, Role::Streamer).await;
        relay.register(&streamer, Role::Streamer).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                ServerMessage::StreamerAccepted,
                ServerMessage::StreamerAccepted,
            ]
        );
        assert_eq!(relay.registry.current_streamer().await, Some(streamer));
    }

    #[tokio::test]
    async fn test_viewer_without_streamer_notified_once() {
        let relay = relay();
        let (viewer, mut rx) = relay.connect("v1").await;

        relay.register(&viewer, Role::Viewer).await;

        assert_eq!(drain(&mut rx), vec![ServerMessage::NoStreamer]);
    }

    #[tokio::test]
    async fn test_viewer_join_notifies_streamer_once() {
        let relay = relay();
        let (streamer, mut streamer_rx) = relay.connect("s1").await;
        relay.register(&streamer, Role::Streamer).await;
        drain(&mut streamer_rx);

        let (viewer, mut viewer_rx) = relay.connect("v1").await;
        relay.register(&viewer, Role::Viewer).await;

        assert_eq!(
            drain(&mut streamer_rx),
            vec![ServerMessage::ViewerJoined {
                viewer_id: viewer.clone(),
            }]
        );
        // The viewer itself hears nothing on a successful join
        assert!(drain(&mut viewer_rx).is_empty());
    }

    #[tokio::test]
    async fn test_streamer_disconnect_broadcasts_stop() {
        let relay = relay();
        let (streamer, _streamer_rx) = relay.connect("s1").await;
        relay.register(&streamer, Role::Streamer).await;

        let (v1, mut v1_rx) = relay.connect("v1").await;
        let (v2, mut v2_rx) = relay.connect("v2").await;
        relay.register(&v1, Role::Viewer).await;
        relay.register(&v2, Role::Viewer).await;

        relay.disconnect(&streamer).await;

        assert_eq!(drain(&mut v1_rx), vec![ServerMessage::StreamerStopped]);
        assert_eq!(drain(&mut v2_rx), vec![ServerMessage::StreamerStopped]);
        assert_eq!(relay.registry.current_streamer().await, None);
    }

    #[tokio::test]
    async fn test_viewer_disconnect_notifies_streamer() {
        let relay = relay();
        let (streamer, mut streamer_rx) = relay.connect("s1").await;
        relay.register(&streamer, Role::Streamer).await;

        let (viewer, _viewer_rx) = relay.connect("v1").await;
        relay.register(&viewer, Role::Viewer).await;
        drain(&mut streamer_rx);

        relay.disconnect(&viewer).await;

        assert_eq!(
            drain(&mut streamer_rx),
            vec![ServerMessage::ViewerLeft {
                viewer_id: viewer.clone(),
            }]
        );
    }

    #[tokio::test]
    async fn test_viewer_disconnect_without_streamer_is_silent() {
        let relay = relay();
        let (viewer, mut viewer_rx) = relay.connect("v1").await;
        relay.register(&viewer, Role::Viewer).await;
        drain(&mut viewer_rx);

        let (other, mut other_rx) = relay.connect("v2").await;
        relay.register(&other, Role::Viewer).await;
        drain(&mut other_rx);

        relay.disconnect(&viewer).await;

        assert!(drain(&mut other_rx).is_empty());
    }

    #[tokio::test]
    async fn test_unassigned_disconnect_notifies_streamer() {
        let relay = relay();
        let (streamer, mut streamer_rx) = relay.connect("s1").await;
        relay.register(&streamer, Role::Streamer).await;
        drain(&mut streamer_rx);

        // Connected but never registered a role
        let (idle, _idle_rx) = relay.connect("c1").await;
        relay.disconnect(&idle).await;

        assert_eq!(
            drain(&mut streamer_rx),
            vec![ServerMessage::ViewerLeft {
                viewer_id: idle.clone(),
            }]
        );
    }

    #[tokio::test]
    async fn test_relay_payload_reaches_target_only() {
        let relay = relay();
        let (streamer, mut streamer_rx) = relay.connect("s1").await;
        let (viewer, mut viewer_rx) = relay.connect("v1").await;
        let (_other, mut other_rx) = relay.connect("v2").await;

        relay
            .lifecycle
            .handle_event(TransportEvent::Message(
                streamer.clone(),
                ClientMessage::Offer {
                    to: viewer.clone(),
                    sdp: json!("o1"),
                },
            ))
            .await;

        assert_eq!(
            drain(&mut viewer_rx),
            vec![ServerMessage::Offer {
                from: streamer.clone(),
                sdp: json!("o1"),
            }]
        );
        assert!(drain(&mut streamer_rx).is_empty());
        assert!(drain(&mut other_rx).is_empty());
    }

    #[tokio::test]
    async fn test_relay_to_departed_target_is_silent() {
        let relay = relay();
        let (streamer, mut streamer_rx) = relay.connect("s1").await;
        let (viewer, _viewer_rx) = relay.connect("v1").await;
        relay.disconnect(&viewer).await;

        relay
            .lifecycle
            .handle_event(TransportEvent::Message(
                streamer.clone(),
                ClientMessage::Offer {
                    to: viewer.clone(),
                    sdp: json!("o1"),
                },
            ))
            .await;

        // No error reaches the sender, the message is just gone
        assert!(drain(&mut streamer_rx).is_empty());
        assert_eq!(relay.stats.snapshot().messages_dropped, 1);
    }

    #[tokio::test]
    async fn test_connection_stats_follow_lifecycle() {
        let relay = relay();
        let (a, _a_rx) = relay.connect("a").await;
        let (_b, _b_rx) = relay.connect("b").await;

        relay.disconnect(&a).await;

        let snapshot = relay.stats.snapshot();
        assert_eq!(snapshot.connections_total, 2);
        assert_eq!(snapshot.connections_active, 1);
    }

    /// Full negotiation sequence: register, join, offer/answer exchange,
    /// streamer teardown.
    #[tokio::test]
    async fn test_end_to_end_negotiation() {
        let relay = relay();

        // Connect S, register as streamer
        let (s, mut s_rx) = relay.connect("S").await;
        relay.register(&s, Role::Streamer).await;
        assert_eq!(drain(&mut s_rx), vec![ServerMessage::StreamerAccepted]);

        // Connect V, register as viewer; S learns about V
        let (v, mut v_rx) = relay.connect("V").await;
        relay.register(&v, Role::Viewer).await;
        assert_eq!(
            drain(&mut s_rx),
            vec![ServerMessage::ViewerJoined {
                viewer_id: v.clone(),
            }]
        );

        // S offers to V
        relay
            .lifecycle
            .handle_event(TransportEvent::Message(
                s.clone(),
                ClientMessage::Offer {
                    to: v.clone(),
                    sdp: json!("o1"),
                },
            ))
            .await;
        assert_eq!(
            drain(&mut v_rx),
            vec![ServerMessage::Offer {
                from: s.clone(),
                sdp: json!("o1"),
            }]
        );

        // V answers S
        relay
            .lifecycle
            .handle_event(TransportEvent::Message(
                v.clone(),
                ClientMessage::Answer {
                    to: s.clone(),
                    sdp: json!("a1"),
                },
            ))
            .await;
        assert_eq!(
            drain(&mut s_rx),
            vec![ServerMessage::Answer {
                from: v.clone(),
                sdp: json!("a1"),
            }]
        );

        // S disconnects; V is told the stream is over
        relay.disconnect(&s).await;
        assert_eq!(drain(&mut v_rx), vec![ServerMessage::StreamerStopped]);
        assert_eq!(relay.registry.current_streamer().await, None);
    }
}
