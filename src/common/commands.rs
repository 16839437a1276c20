use crate::common::types::PeerMessage;

/// Commands handed down to whichever transport is running.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Broadcast the local peer's latest state on the channel.
    Publish(PeerMessage),
}
