//! JSON wire format: `{"sender": "<uuid>", "data": {x, y, width, height, offset}}`.

use crate::common::{Identity, PeerMessage};
use crate::error::RadarError;

pub fn encode(message: &PeerMessage) -> Result<Vec<u8>, RadarError> {
    Ok(serde_json::to_vec(message)?)
}

/// Parses and validates one payload. Negative extents fail at the type
/// level; a chrome offset taller than the window is rejected here.
pub fn decode(payload: &[u8]) -> Result<PeerMessage, RadarError> {
    let message: PeerMessage = serde_json::from_slice(payload)?;
    if message.data.offset > message.data.height {
        return Err(RadarError::InvalidState(format!(
            "offset {} exceeds height {}",
            message.data.offset, message.data.height
        )));
    }
    Ok(message)
}

/// Inbound filter shared by every transport: drops malformed payloads and
/// our own announcements echoed back by the channel.
pub fn accept_inbound(local: Identity, payload: &[u8]) -> Option<PeerMessage> {
    match decode(payload) {
        Ok(message) if message.sender == local => None,
        Ok(message) => Some(message),
        Err(err) => {
            log::debug!("Dropping inbound payload ({} bytes): {err}", payload.len());
            None
        }
    }
}
