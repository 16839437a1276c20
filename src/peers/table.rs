use std::collections::HashMap;
use std::time::Instant;

use crate::common::{Identity, PeerMessage, PeerState};
use crate::error::RadarError;
use crate::geometry::{self, AnchorConfig, Vector};

use super::eviction::EvictionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerEntry {
    pub state: PeerState,
    /// When this process last wrote the entry. Local clock only; never sent.
    pub updated_at: Instant,
}

/// Outcome of a remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Last known state per identity. Writes replace the whole entry; there is no
/// merging and no comparison of message age.
#[derive(Debug, Clone)]
pub struct PeerTable {
    local: Identity,
    entries: HashMap<Identity, PeerEntry>,
}

impl PeerTable {
    pub fn new(local: Identity) -> Self {
        Self {
            local,
            entries: HashMap::new(),
        }
    }

    pub fn local_identity(&self) -> Identity {
        self.local
    }

    pub fn apply_local(&mut self, state: PeerState, now: Instant) {
        self.entries.insert(
            self.local,
            PeerEntry {
                state,
                updated_at: now,
            },
        );
    }

    pub fn apply_remote(&mut self, message: &PeerMessage, now: Instant) -> Upsert {
        if message.sender == self.local {
            log::trace!("Remote write for the local identity; overwriting");
        }

        let previous = self.entries.insert(
            message.sender,
            PeerEntry {
                state: message.data,
                updated_at: now,
            },
        );

        match previous {
            Some(_) => Upsert::Replaced,
            None => Upsert::Inserted,
        }
    }

    pub fn get(&self, id: &Identity) -> Option<&PeerState> {
        self.entries.get(id).map(|entry| &entry.state)
    }

    pub fn entry(&self, id: &Identity) -> Option<&PeerEntry> {
        self.entries.get(id)
    }

    pub fn local_state(&self) -> Option<&PeerState> {
        self.get(&self.local)
    }

    /// Snapshot of every identity currently held. Order is unspecified.
    pub fn ids(&self) -> Vec<Identity> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &PeerEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector from the local anchor to `id`'s anchor.
    pub fn vector_to(&self, anchor: &AnchorConfig, id: &Identity) -> Result<Vector, RadarError> {
        let me = self.local_state().ok_or(RadarError::NoSelfState)?;
        let other = self.get(id).ok_or(RadarError::UnknownPeer(*id))?;
        Ok(geometry::relative_vector(anchor, me, other))
    }

    /// Removes the remote entries `policy` flags and returns their identities.
    pub fn evict(&mut self, policy: &dyn EvictionPolicy, now: Instant) -> Vec<Identity> {
        let local = self.local;
        let stale: Vec<Identity> = self
            .entries
            .iter()
            .filter(|(id, entry)| **id != local && policy.should_evict(entry, now))
            .map(|(id, _)| *id)
            .collect();

        for id in &stale {
            self.entries.remove(id);
        }
        stale
    }
}
