use tokio::sync::watch;

use crate::common::PeerState;

/// Anything that can report the local viewport on demand.
pub trait ViewportSource: Send + 'static {
    /// `None` while the host cannot tell where the window is.
    fn sample(&mut self) -> Option<PeerState>;
}

/// Latest sample pushed by the UI thread on every frame.
impl ViewportSource for watch::Receiver<Option<PeerState>> {
    fn sample(&mut self) -> Option<PeerState> {
        *self.borrow_and_update()
    }
}

/// A window that never moves. Used by the headless simulation.
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub PeerState);

impl ViewportSource for FixedViewport {
    fn sample(&mut self) -> Option<PeerState> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_source_reports_latest() {
        let (tx, mut rx) = watch::channel(None);
        assert_eq!(rx.sample(), None);

        let first = PeerState {
            x: 1,
            ..PeerState::default()
        };
        let second = PeerState {
            x: 2,
            ..PeerState::default()
        };
        tx.send_replace(Some(first));
        tx.send_replace(Some(second));
        assert_eq!(rx.sample(), Some(second));
        assert_eq!(rx.sample(), Some(second));
    }
}
