//! Self-announce cadence: sample, report locally, publish. Un-acknowledged
//! and best-effort; a full channel loses that tick's message.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::common::{Identity, NetworkCommand, NetworkEvent, PeerMessage};

use super::schedule::{TaskHandle, spawn_repeating};
use super::source::ViewportSource;

pub const DEFAULT_ANNOUNCE_INTERVAL: Duration = Duration::from_millis(20);

/// Where each announcement goes: the local table owner and the transport.
#[derive(Debug, Clone)]
pub struct AnnounceSink {
    pub local: mpsc::Sender<NetworkEvent>,
    pub transport: mpsc::Sender<NetworkCommand>,
}

impl AnnounceSink {
    fn deliver(&self, message: PeerMessage) {
        if let Err(err) = self.local.try_send(NetworkEvent::LocalReport(message)) {
            log::debug!("Local report dropped: {err}");
        }
        if let Err(err) = self.transport.try_send(NetworkCommand::Publish(message)) {
            log::debug!("Announcement dropped before transport: {err}");
        }
    }
}

pub struct Announcer {
    identity: Identity,
    period: Duration,
}

impl Announcer {
    pub fn new(identity: Identity, period: Duration) -> Self {
        Self { identity, period }
    }

    /// Builds the message for one tick, or `None` if there is nothing to
    /// report yet.
    pub fn announcement(&self, source: &mut dyn ViewportSource) -> Option<PeerMessage> {
        source
            .sample()
            .map(|state| PeerMessage::new(self.identity, state))
    }

    pub fn spawn<S>(self, mut source: S, sink: AnnounceSink) -> TaskHandle
    where
        S: ViewportSource,
    {
        log::info!(
            "Announcing {} every {} ms",
            self.identity,
            self.period.as_millis()
        );
        let period = self.period;
        let mut waiting_logged = false;
        spawn_repeating("announcer", period, move || {
            match self.announcement(&mut source) {
                Some(message) => sink.deliver(message),
                None if !waiting_logged => {
                    log::info!("Viewport position not available yet; holding announcements");
                    waiting_logged = true;
                }
                None => {}
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PeerState;
    use crate::protocol::source::FixedViewport;

    fn state() -> PeerState {
        PeerState {
            x: 10,
            y: 20,
            width: 300,
            height: 220,
            offset: 20,
        }
    }

    #[test]
    fn test_announcement_carries_identity_and_sample() {
        let id = Identity::generate();
        let announcer = Announcer::new(id, DEFAULT_ANNOUNCE_INTERVAL);
        let message = announcer
            .announcement(&mut FixedViewport(state()))
            .unwrap();
        assert_eq!(message, PeerMessage::new(id, state()));
    }

    #[tokio::test]
    async fn test_tick_reports_locally_and_publishes() {
        let id = Identity::generate();
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let (cmd_tx, mut cmd_rx) = mpsc::channel(16);

        let handle = Announcer::new(id, Duration::from_millis(5)).spawn(
            FixedViewport(state()),
            AnnounceSink {
                local: event_tx,
                transport: cmd_tx,
            },
        );

        let event = event_rx.recv().await.unwrap();
        assert!(matches!(event, NetworkEvent::LocalReport(m) if m.sender == id));
        let NetworkCommand::Publish(published) = cmd_rx.recv().await.unwrap();
        assert_eq!(published, PeerMessage::new(id, state()));

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_nothing_sent_without_sample() {
        let (sample_tx, sample_rx) = tokio::sync::watch::channel(None);
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let (cmd_tx, _cmd_rx) = mpsc::channel(16);

        let handle = Announcer::new(Identity::generate(), Duration::from_millis(2)).spawn(
            sample_rx,
            AnnounceSink {
                local: event_tx,
                transport: cmd_tx,
            },
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(event_rx.try_recv().is_err());

        sample_tx.send_replace(Some(state()));
        let event = tokio::time::timeout(Duration::from_secs(2), event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, NetworkEvent::LocalReport(m) if m.data == state()));

        handle.stop().await;
    }
}
