pub mod behavior;
pub mod client;
pub mod local;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::common::NetworkEvent;

pub use client::GossipClient;
pub use local::{LocalBus, LocalBusClient};

/// Hands an event to the table owner without waiting on it. A full queue
/// drops the event, the same as a missed announce tick. Returns `false` once
/// the receiving side is gone.
pub(crate) fn forward(sender: &mpsc::Sender<NetworkEvent>, event: NetworkEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            log::debug!("Event queue full; dropped {event:?}");
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}
