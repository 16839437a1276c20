//! Several headless peers inside one process, wired through a `LocalBus`.
//! Each peer runs the same announcer, transport client and session loop a
//! window would, with a fixed viewport instead of a real one.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::common::{Identity, PeerState};
use crate::config::AppConfig;
use crate::network::{LocalBus, LocalBusClient};
use crate::peers::eviction;
use crate::protocol::{AnnounceSink, Announcer, FixedViewport, TaskHandle};
use crate::session::{PeerSession, SessionReport};

pub const HEADLESS_FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Windows of the same size side by side, `spacing` apart.
pub fn row_layout(peers: usize, spacing: i32) -> Vec<PeerState> {
    (0..peers)
        .map(|index| PeerState {
            x: spacing.saturating_mul(index as i32),
            y: 0,
            width: 300,
            height: 220,
            offset: 20,
        })
        .collect()
}

pub struct SimulatedPeer {
    announcer: TaskHandle,
    session: TaskHandle,
    transport: JoinHandle<()>,
    reports: watch::Receiver<SessionReport>,
}

impl SimulatedPeer {
    pub fn start(config: &AppConfig, bus: &LocalBus, viewport: PeerState) -> Self {
        let identity = Identity::generate();
        let (cmd_tx, cmd_rx) = mpsc::channel(256);
        let (event_tx, event_rx) = mpsc::channel(1024);

        let client = LocalBusClient::new(
            identity,
            config.topic_name(),
            bus.clone(),
            event_tx.clone(),
            cmd_rx,
        );
        let transport = tokio::spawn(async move {
            if let Err(err) = client.run().await {
                log::error!("Local transport terminated: {err}");
            }
        });

        let announcer = Announcer::new(identity, config.announce_interval()).spawn(
            FixedViewport(viewport),
            AnnounceSink {
                local: event_tx,
                transport: cmd_tx,
            },
        );

        let (session, reports) = PeerSession::new(identity, config.anchor, config.render)
            .with_eviction(eviction::from_idle_timeout(config.eviction.idle_timeout()))
            .spawn_headless(event_rx, HEADLESS_FRAME_PERIOD);

        Self {
            announcer,
            session,
            transport,
            reports,
        }
    }

    /// Stops announcing first so the transport drains, then the session.
    pub async fn stop(self) -> SessionReport {
        self.announcer.stop().await;
        if let Err(err) = self.transport.await {
            log::warn!("Local transport task failed: {err}");
        }
        let report = self.reports.borrow().clone();
        self.session.stop().await;
        report
    }
}

pub async fn run(config: &AppConfig, peers: usize, spacing: i32, duration: Duration) -> Vec<SessionReport> {
    let bus = LocalBus::default();
    let started: Vec<SimulatedPeer> = row_layout(peers, spacing)
        .into_iter()
        .map(|viewport| SimulatedPeer::start(config, &bus, viewport))
        .collect();
    log::info!("Simulating {} peers on `{}`", started.len(), config.topic_name());

    tokio::time::sleep(duration).await;

    let mut reports = Vec::with_capacity(started.len());
    for peer in started {
        reports.push(peer.stop().await);
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_layout() {
        let layout = row_layout(3, 500);
        assert_eq!(layout.len(), 3);
        assert_eq!(layout[2].x, 1000);
        assert!(layout.iter().all(|state| state.offset == 20));
    }
}
