use std::time::{Duration, Instant};

use super::table::PeerEntry;

/// Decides which remote entries leave the table. Never consulted for the
/// local entry.
pub trait EvictionPolicy: Send {
    fn should_evict(&self, entry: &PeerEntry, now: Instant) -> bool;
}

/// Entries stay for the life of the process. Memory grows with every
/// identity ever seen on the channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepForever;

impl EvictionPolicy for KeepForever {
    fn should_evict(&self, _entry: &PeerEntry, _now: Instant) -> bool {
        false
    }
}

/// Drops an entry once it has gone `window` without an update.
#[derive(Debug, Clone, Copy)]
pub struct IdleTimeout {
    pub window: Duration,
}

impl IdleTimeout {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }
}

impl EvictionPolicy for IdleTimeout {
    fn should_evict(&self, entry: &PeerEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.updated_at) > self.window
    }
}

/// Builds the policy selected by `eviction.idle_timeout_ms`.
pub fn from_idle_timeout(idle_timeout: Option<Duration>) -> Box<dyn EvictionPolicy> {
    match idle_timeout {
        Some(window) => Box::new(IdleTimeout::new(window)),
        None => Box::new(KeepForever),
    }
}
