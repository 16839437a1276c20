use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of one peer process. Generated once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl Identity {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// First eight hex digits, enough to tell peers apart in readouts.
    pub fn short(&self) -> String {
        let mut text = self.0.simple().to_string();
        text.truncate(8);
        text
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Last reported viewport of a peer, in shared screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PeerState {
    pub x: i32,
    pub y: i32,
    /// Outer width, chrome included.
    pub width: u32,
    /// Outer height, chrome included.
    pub height: u32,
    /// Outer height minus content height.
    pub offset: u32,
}

/// What goes over the wire on every announce tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerMessage {
    pub sender: Identity,
    pub data: PeerState,
}

impl PeerMessage {
    pub fn new(sender: Identity, data: PeerState) -> Self {
        Self { sender, data }
    }
}
