use std::time::Instant;

use chrono::{DateTime, Local};

use crate::common::{Identity, NetworkEvent, PeerState};
use crate::session::{PeerSession, SessionUpdate};

const MAX_DEBUG_EVENTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Listening,
    LinkUp,
    LinkDown,
    Discovered,
    Evicted,
}

#[derive(Debug, Clone)]
pub struct DebugEvent {
    pub timestamp: DateTime<Local>,
    pub kind: EventKind,
    pub message: String,
}

/// Raw window metrics behind the last sample, shown in the details panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalDetails {
    pub outer_pos: egui::Pos2,
    pub outer_size: egui::Vec2,
    pub inner_size: egui::Vec2,
    pub monitor_size: Option<egui::Vec2>,
    pub state: PeerState,
}

/// Text readout for one remote peer, created on its first message.
#[derive(Debug, Clone)]
pub struct PeerReadout {
    pub id: Identity,
    pub text: String,
}

pub struct AppState {
    pub session: PeerSession,
    pub details: Option<LocalDetails>,
    pub readouts: Vec<PeerReadout>,
    pub debug_events: Vec<DebugEvent>,
}

impl AppState {
    pub fn new(session: PeerSession) -> Self {
        Self {
            session,
            details: None,
            readouts: Vec::new(),
            debug_events: Vec::new(),
        }
    }

    pub fn apply_event(&mut self, event: NetworkEvent, now: Instant) {
        match self.session.handle(&event, now) {
            SessionUpdate::Discovered(id) => {
                self.add_debug_event(EventKind::Discovered, format!("Peer {} appeared", id.short()));
                self.refresh_readout(id);
            }
            SessionUpdate::Refreshed(id) => self.refresh_readout(id),
            SessionUpdate::Local => {}
            SessionUpdate::Untouched => match event {
                NetworkEvent::Listening(address) => {
                    self.add_debug_event(EventKind::Listening, format!("Listening on {address}"));
                }
                NetworkEvent::LinkUp(link) => {
                    self.add_debug_event(EventKind::LinkUp, format!("Link up {}", short_link(&link)));
                }
                NetworkEvent::LinkDown(link) => {
                    self.add_debug_event(EventKind::LinkDown, format!("Link down {}", short_link(&link)));
                }
                NetworkEvent::LocalReport(_) | NetworkEvent::PeerReported(_) => {}
            },
        }
    }

    pub fn evict(&mut self, now: Instant) {
        for id in self.session.evict(now) {
            self.readouts.retain(|readout| readout.id != id);
            self.add_debug_event(EventKind::Evicted, format!("Peer {} went quiet", id.short()));
        }
    }

    fn refresh_readout(&mut self, id: Identity) {
        let Some(state) = self.session.table().get(&id) else {
            return;
        };
        let text = serde_json::to_string_pretty(state).unwrap_or_else(|_| format!("{state:?}"));

        match self.readouts.iter_mut().find(|readout| readout.id == id) {
            Some(readout) => readout.text = text,
            None => self.readouts.push(PeerReadout { id, text }),
        }
    }

    pub fn add_debug_event(&mut self, kind: EventKind, message: String) {
        self.debug_events.push(DebugEvent {
            timestamp: Local::now(),
            kind,
            message,
        });

        if self.debug_events.len() > MAX_DEBUG_EVENTS {
            self.debug_events.remove(0);
        }
    }
}

fn short_link(link: &str) -> &str {
    let start = link.len().saturating_sub(8);
    link.get(start..).unwrap_or(link)
}
