//! Wire protocol for the signaling relay
//!
//! JSON text frames over WebSocket. Messages are internally tagged with a
//! `type` field; negotiation bodies (`sdp`, `candidate`) are carried as
//! opaque JSON values and never interpreted by the relay.

pub mod message;

pub use message::{ClientMessage, Role, ServerMessage};
