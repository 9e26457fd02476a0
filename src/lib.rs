//! # signaling-rs
//!
//! A WebRTC signaling relay: brokers session negotiation between one
//! broadcasting peer (the streamer) and any number of watching peers
//! (viewers) so they can establish direct peer-to-peer media connections.
//! The relay never touches media; it forwards small negotiation payloads
//! (session descriptions and connectivity candidates) between connections
//! addressed by opaque identifiers.
//!
//! # Architecture
//!
//! ```text
//!   WebSocket clients
//!         │ JSON text frames
//!         ▼
//!   server::Connection ──► TransportEvent ──► SessionLifecycle
//!                                                │        │
//!                                   register/disconnect  offer/answer/ice
//!                                                │        │
//!                                                ▼        ▼
//!                                    ConnectionRegistry  MessageRouter
//!                                     (streamer slot)         │
//!                                                             ▼
//!                                                       ConnectionHub ──► peers
//! ```
//!
//! The registry enforces the single-streamer invariant: the first
//! connection to register as streamer holds the slot until it disconnects;
//! later attempts are answered with `streamer-rejected`. Viewers join and
//! leave freely, and the streamer is told about each of them.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use signaling_rs::{ServerConfig, SignalingServer};
//!
//! #[tokio::main]
//! async fn main() -> signaling_rs::Result<()> {
//!     let config = ServerConfig::default();
//!     let server = SignalingServer::new(config);
//!     server.run().await
//! }
//! ```

pub mod error;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;
pub mod session;
pub mod stats;
pub mod transport;

pub use error::{Error, Result};
pub use protocol::{ClientMessage, Role, ServerMessage};
pub use registry::{ConnectionId, ConnectionRegistry, ConnectionRole, RegistryError};
pub use router::MessageRouter;
pub use server::{ServerConfig, SignalingServer};
pub use session::{SessionLifecycle, TransportEvent};
pub use stats::{RelayStats, StatsSnapshot};
pub use transport::ConnectionHub;
