//! Error taxonomy for the peer table, geometry queries and inbound payloads.
//!
//! None of these are fatal: callers skip the peer or drop the payload.

use thiserror::Error;

use crate::common::Identity;

#[derive(Debug, Error)]
pub enum RadarError {
    #[error("local peer has not reported its own state yet")]
    NoSelfState,

    #[error("no state known for peer {0}")]
    UnknownPeer(Identity),

    #[error("malformed peer message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid peer state: {0}")]
    InvalidState(String),
}

impl RadarError {
    /// True for the "not known yet" conditions the render step silently skips.
    pub fn is_not_yet_known(&self) -> bool {
        matches!(self, RadarError::NoSelfState | RadarError::UnknownPeer(_))
    }
}
