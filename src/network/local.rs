//! In-process broadcast channels keyed by name. Every subscriber on a name,
//! the publisher included, receives each payload; slow subscribers lose the
//! oldest payloads rather than blocking publishers.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, mpsc};

use crate::common::{Identity, NetworkCommand, NetworkEvent};
use crate::protocol::wire;

use super::forward;

pub const DEFAULT_BUS_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct LocalBus {
    capacity: usize,
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<Vec<u8>>>>>,
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl LocalBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Publisher and receiver for `channel`, created on first use.
    pub fn join(&self, channel: &str) -> (broadcast::Sender<Vec<u8>>, broadcast::Receiver<Vec<u8>>) {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();
        let receiver = sender.subscribe();
        (sender, receiver)
    }
}

/// Transport client over a `LocalBus` channel. Same command/event contract
/// as the gossipsub client.
pub struct LocalBusClient {
    local: Identity,
    channel: String,
    bus: LocalBus,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
}

impl LocalBusClient {
    pub fn new(
        local: Identity,
        channel: impl Into<String>,
        bus: LocalBus,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        Self {
            local,
            channel: channel.into(),
            bus,
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let (publisher, mut inbound) = self.bus.join(&self.channel);
        log::info!("Joined local channel `{}` as {}", self.channel, self.local);
        if !forward(
            &self.event_sender,
            NetworkEvent::Listening(format!("local:{}", self.channel)),
        ) {
            log::info!("Event receiver gone; leaving local channel `{}`", self.channel);
            return Ok(());
        }

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(NetworkCommand::Publish(message)) => {
                            let payload = wire::encode(&message)?;
                            // no receivers is not an error on a broadcast channel
                            let _ = publisher.send(payload);
                        }
                        None => break,
                    }
                }
                received = inbound.recv() => {
                    match received {
                        Ok(payload) => {
                            if let Some(message) = wire::accept_inbound(self.local, &payload) {
                                if !forward(&self.event_sender, NetworkEvent::PeerReported(message)) {
                                    break;
                                }
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            log::warn!("Local channel `{}` lagged; {skipped} payloads lost", self.channel);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        log::info!("Left local channel `{}`", self.channel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_shares_channel_by_name() {
        let bus = LocalBus::new(8);
        let (tx, mut first) = bus.join("radar");
        let (_, mut second) = bus.join("radar");
        let (_, mut other) = bus.join("elsewhere");

        tx.send(b"hello".to_vec()).unwrap();

        assert_eq!(first.try_recv().unwrap(), b"hello".to_vec());
        assert_eq!(second.try_recv().unwrap(), b"hello".to_vec());
        assert!(other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_run_stops_when_event_receiver_is_gone() {
        let (event_tx, event_rx) = mpsc::channel(4);
        let (_cmd_tx, cmd_rx) = mpsc::channel(4);
        drop(event_rx);

        let client = LocalBusClient::new(Identity::generate(), "radar", LocalBus::new(8), event_tx, cmd_rx);
        tokio::time::timeout(std::time::Duration::from_secs(2), client.run())
            .await
            .unwrap()
            .unwrap();
    }
}
