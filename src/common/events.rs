use crate::common::types::PeerMessage;

/// Everything that flows up to the owner of the peer table.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    /// The announcer sampled the local viewport.
    LocalReport(PeerMessage),
    /// A decoded announcement from another peer.
    PeerReported(PeerMessage),
    /// Transport-level link to another process came up.
    LinkUp(String),
    LinkDown(String),
    Listening(String),
}
