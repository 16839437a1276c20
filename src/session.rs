//! Single owner of the peer table. Local reports and remote announcements are
//! applied here in the order they are dispatched; nothing else writes the
//! table, so it needs no lock.

use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

use crate::common::{Identity, NetworkEvent};
use crate::geometry::{AnchorConfig, Vector};
use crate::peers::{EvictionPolicy, KeepForever, PeerTable, Upsert};
use crate::protocol::TaskHandle;
use crate::render::{FrameSummary, RecordingSurface, RenderConfig, Surface, render_frame};

/// What a single event did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    Local,
    Discovered(Identity),
    Refreshed(Identity),
    /// Transport notices carry no peer state.
    Untouched,
}

pub struct PeerSession {
    table: PeerTable,
    anchor: AnchorConfig,
    render: RenderConfig,
    eviction: Box<dyn EvictionPolicy>,
}

impl PeerSession {
    pub fn new(local: Identity, anchor: AnchorConfig, render: RenderConfig) -> Self {
        Self {
            table: PeerTable::new(local),
            anchor,
            render,
            eviction: Box::new(KeepForever),
        }
    }

    pub fn with_eviction(mut self, eviction: Box<dyn EvictionPolicy>) -> Self {
        self.eviction = eviction;
        self
    }

    pub fn local_identity(&self) -> Identity {
        self.table.local_identity()
    }

    pub fn table(&self) -> &PeerTable {
        &self.table
    }

    pub fn anchor(&self) -> &AnchorConfig {
        &self.anchor
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn handle(&mut self, event: &NetworkEvent, now: Instant) -> SessionUpdate {
        match event {
            NetworkEvent::LocalReport(message) => {
                if message.sender != self.table.local_identity() {
                    log::warn!("Local report from foreign identity {}", message.sender);
                    return SessionUpdate::Untouched;
                }
                self.table.apply_local(message.data, now);
                SessionUpdate::Local
            }
            NetworkEvent::PeerReported(message) => {
                match self.table.apply_remote(message, now) {
                    Upsert::Inserted => {
                        log::info!("Discovered peer {}", message.sender);
                        SessionUpdate::Discovered(message.sender)
                    }
                    Upsert::Replaced => SessionUpdate::Refreshed(message.sender),
                }
            }
            NetworkEvent::LinkUp(_) | NetworkEvent::LinkDown(_) | NetworkEvent::Listening(_) => {
                SessionUpdate::Untouched
            }
        }
    }

    pub fn evict(&mut self, now: Instant) -> Vec<Identity> {
        let evicted = self.table.evict(self.eviction.as_ref(), now);
        for id in &evicted {
            log::info!("Evicted idle peer {id}");
        }
        evicted
    }

    pub fn render(&self, surface: &mut dyn Surface) -> FrameSummary {
        render_frame(&self.table, &self.anchor, &self.render, surface)
    }

    /// Vectors to every remote peer that can be placed right now.
    pub fn vectors(&self) -> Vec<(Identity, Vector)> {
        let local = self.table.local_identity();
        let mut vectors: Vec<_> = self
            .table
            .ids()
            .into_iter()
            .filter(|id| *id != local)
            .filter_map(|id| {
                self.table
                    .vector_to(&self.anchor, &id)
                    .ok()
                    .map(|vector| (id, vector))
            })
            .collect();
        vectors.sort_by_key(|(id, _)| *id);
        vectors
    }

    /// Runs the session as its own task: applies events as they arrive and
    /// renders into a recording surface every `frame_period`. The returned
    /// receiver holds the report of the latest frame.
    pub fn spawn_headless(
        mut self,
        mut events: mpsc::Receiver<NetworkEvent>,
        frame_period: Duration,
    ) -> (TaskHandle, watch::Receiver<SessionReport>) {
        let (report_tx, report_rx) = watch::channel(SessionReport::empty(self.local_identity()));

        let handle = TaskHandle::spawn("session", move |mut stop| async move {
            let mut frames = time::interval(frame_period);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut surface = RecordingSurface::new();

            loop {
                tokio::select! {
                    _ = stop.stopped() => break,
                    event = events.recv() => {
                        match event {
                            Some(event) => {
                                self.handle(&event, Instant::now());
                            }
                            None => break,
                        }
                    }
                    _ = frames.tick() => {
                        self.evict(Instant::now());
                        let frame = self.render(&mut surface);
                        report_tx.send_replace(SessionReport {
                            local: self.local_identity(),
                            known_peers: self.table.len(),
                            vectors: self.vectors(),
                            frame,
                        });
                    }
                }
            }
        });

        (handle, report_rx)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub local: Identity,
    pub known_peers: usize,
    pub vectors: Vec<(Identity, Vector)>,
    pub frame: FrameSummary,
}

impl SessionReport {
    fn empty(local: Identity) -> Self {
        Self {
            local,
            known_peers: 0,
            vectors: Vec::new(),
            frame: FrameSummary::default(),
        }
    }
}
