//! Protocol message types
//!
//! The client→relay and relay→client message sets, with the exact tags and
//! field casing clients see on the wire (`viewerId`, `from`, `to`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::ConnectionId;

/// Role requested in a `register` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The single broadcasting peer
    Streamer,
    /// A watching peer
    Viewer,
}

/// Message received from a client
///
/// `sdp` and `candidate` bodies are opaque; the relay forwards them
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Role registration for this transport session
    Register {
        /// Requested role
        role: Role,
    },
    /// Session description offer targeted at one connection
    Offer {
        /// Target connection identifier
        to: ConnectionId,
        /// Opaque session description
        sdp: Value,
    },
    /// Session description answer targeted at one connection
    Answer {
        /// Target connection identifier
        to: ConnectionId,
        /// Opaque session description
        sdp: Value,
    },
    /// Connectivity candidate targeted at one connection
    IceCandidate {
        /// Target connection identifier
        to: ConnectionId,
        /// Opaque candidate payload
        candidate: Value,
    },
}

impl ClientMessage {
    /// Parse a message from a JSON text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Wire tag of this message, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Register { .. } => "register",
            ClientMessage::Offer { .. } => "offer",
            ClientMessage::Answer { .. } => "answer",
            ClientMessage::IceCandidate { .. } => "ice-candidate",
        }
    }
}

/// Message sent to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// The requester now holds the streamer slot
    StreamerAccepted,
    /// The streamer request was refused
    StreamerRejected {
        /// Human-readable refusal reason
        reason: String,
    },
    /// A viewer registered while no streamer is active
    NoStreamer,
    /// A viewer registered; sent to the streamer
    #[serde(rename_all = "camelCase")]
    ViewerJoined {
        /// The viewer's connection identifier
        viewer_id: ConnectionId,
    },
    /// A viewer disconnected; sent to the streamer
    #[serde(rename_all = "camelCase")]
    ViewerLeft {
        /// The viewer's connection identifier
        viewer_id: ConnectionId,
    },
    /// Forwarded session description offer
    Offer {
        /// Identifier of the sending connection
        from: ConnectionId,
        /// Opaque session description
        sdp: Value,
    },
    /// Forwarded session description answer
    Answer {
        /// Identifier of the sending connection
        from: ConnectionId,
        /// Opaque session description
        sdp: Value,
    },
    /// Forwarded connectivity candidate
    IceCandidate {
        /// Identifier of the sending connection
        from: ConnectionId,
        /// Opaque candidate payload
        candidate: Value,
    },
    /// The streamer disconnected; sent to every connected transport
    StreamerStopped,
}

impl ServerMessage {
    /// Serialize this message to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Wire tag of this message, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::StreamerAccepted => "streamer-accepted",
            ServerMessage::StreamerRejected { .. } => "streamer-rejected",
            ServerMessage::NoStreamer => "no-streamer",
            ServerMessage::ViewerJoined { .. } => "viewer-joined",
            ServerMessage::ViewerLeft { .. } => "viewer-left",
            ServerMessage::Offer { .. } => "offer",
            ServerMessage::Answer { .. } => "answer",
            ServerMessage::IceCandidate { .. } => "ice-candidate",
            ServerMessage::StreamerStopped => "streamer-stopped",
        }
    }
}
