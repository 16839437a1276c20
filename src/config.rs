use std::fs;
use std::path::Path;
use std::time::Duration;

use libp2p::multiaddr::{self, Protocol};
use libp2p::{Multiaddr, PeerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::AnchorConfig;
use crate::protocol::DEFAULT_ANNOUNCE_INTERVAL;
use crate::render::RenderConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/radar.json";
pub const DEFAULT_CHANNEL: &str = "local windows";
pub const DEFAULT_LISTEN_ADDR: &str = "/ip4/127.0.0.1/tcp/0";

/// Why a `static_peers` entry cannot be dialled.
#[derive(Debug, Error)]
pub enum StaticPeerError {
    #[error("`{entry}` is not a multiaddr: {source}")]
    InvalidAddress {
        entry: String,
        source: multiaddr::Error,
    },

    #[error("`{0}` does not end in /p2p/<PeerId>")]
    MissingPeerId(String),

    #[error("`{0}` is not a loopback address")]
    NotLoopback(String),
}

/// Splits `/ip4/127.0.0.1/tcp/<port>/p2p/<PeerId>` into the peer id and the
/// address to dial. Only loopback hosts are accepted.
pub fn parse_static_peer(entry: &str) -> Result<(PeerId, Multiaddr), StaticPeerError> {
    let mut addr: Multiaddr = entry
        .parse()
        .map_err(|source| StaticPeerError::InvalidAddress {
            entry: entry.to_string(),
            source,
        })?;

    let Some(Protocol::P2p(peer_id)) = addr.pop() else {
        return Err(StaticPeerError::MissingPeerId(entry.to_string()));
    };

    let loopback = match addr.iter().next() {
        Some(Protocol::Ip4(ip)) => ip.is_loopback(),
        Some(Protocol::Ip6(ip)) => ip.is_loopback(),
        _ => false,
    };
    if !loopback {
        return Err(StaticPeerError::NotLoopback(entry.to_string()));
    }

    Ok((peer_id, addr))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionConfig {
    /// Drop remote peers silent for this long. Absent keeps them forever.
    pub idle_timeout_ms: Option<u64>,
}

impl EvictionConfig {
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_ms.map(Duration::from_millis)
    }
}

/// Everything a peer needs to join a channel. `channel` and `anchor` must be
/// identical on every peer that should see each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub channel: String,
    pub announce_interval_ms: u64,
    pub anchor: AnchorConfig,
    pub render: RenderConfig,
    pub eviction: EvictionConfig,
    pub listen_addr: String,
    /// `/ip4/.../tcp/.../p2p/<PeerId>` addresses dialled at start-up, for
    /// machines where mDNS is blocked.
    pub static_peers: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            announce_interval_ms: DEFAULT_ANNOUNCE_INTERVAL.as_millis() as u64,
            anchor: AnchorConfig::default(),
            render: RenderConfig::default(),
            eviction: EvictionConfig::default(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            static_peers: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn announce_interval(&self) -> Duration {
        Duration::from_millis(self.announce_interval_ms.max(1))
    }

    /// Dialable static peers. Entries that fail to parse are logged and
    /// skipped.
    pub fn static_peers(&self) -> Vec<(PeerId, Multiaddr)> {
        self.static_peers
            .iter()
            .filter_map(|entry| match parse_static_peer(entry) {
                Ok(peer) => Some(peer),
                Err(err) => {
                    log::warn!("Ignoring static peer: {err}");
                    None
                }
            })
            .collect()
    }

    /// Topic actually joined. The anchor insets are folded in so peers that
    /// disagree on them never share a topic.
    pub fn topic_name(&self) -> String {
        format!(
            "{}/anchor-{}x{}",
            self.channel, self.anchor.inset_x, self.anchor.inset_y
        )
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|err| {
            log::warn!("Failed to parse config file {}: {err}", path.display());
            AppConfig::default()
        }),
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, serde_json::Error> {
    serde_json::from_str::<AppConfig>(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behaviour() {
        let config = AppConfig::default();
        assert_eq!(config.announce_interval(), Duration::from_millis(20));
        assert_eq!(config.anchor, AnchorConfig { inset_x: 100, inset_y: 100 });
        assert_eq!(config.render.canvas_size, 200.0);
        assert_eq!(config.eviction.idle_timeout(), None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"{"channel":"desk","anchor":{"inset_x":40},"eviction":{"idle_timeout_ms":1500}}"#,
        )
        .unwrap();

        assert_eq!(config.channel, "desk");
        assert_eq!(config.anchor.inset_x, 40);
        assert_eq!(config.anchor.inset_y, 100);
        assert_eq!(config.eviction.idle_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn test_topic_name_includes_anchor_contract() {
        let mut config = AppConfig::default();
        assert_eq!(config.topic_name(), "local windows/anchor-100x100");
        config.anchor.inset_y = 80;
        assert_ne!(config.topic_name(), AppConfig::default().topic_name());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = AppConfig {
            announce_interval_ms: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.announce_interval(), Duration::from_millis(1));
    }

    fn peer_id() -> PeerId {
        libp2p::identity::Keypair::generate_ed25519()
            .public()
            .to_peer_id()
    }

    #[test]
    fn test_parse_static_peer() {
        let id = peer_id();
        let (parsed, addr) = parse_static_peer(&format!("/ip4/127.0.0.1/tcp/4001/p2p/{id}")).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(addr.to_string(), "/ip4/127.0.0.1/tcp/4001");
    }

    #[test]
    fn test_static_peer_errors() {
        assert!(matches!(
            parse_static_peer("not an address"),
            Err(StaticPeerError::InvalidAddress { .. })
        ));
        assert!(matches!(
            parse_static_peer("/ip4/127.0.0.1/tcp/4001"),
            Err(StaticPeerError::MissingPeerId(_))
        ));
        assert!(matches!(
            parse_static_peer(&format!("/ip4/10.0.0.7/tcp/4001/p2p/{}", peer_id())),
            Err(StaticPeerError::NotLoopback(_))
        ));
    }

    #[test]
    fn test_static_peers_skip_bad_entries() {
        let id = peer_id();
        let config = AppConfig {
            static_peers: vec![
                format!("/ip6/::1/tcp/4001/p2p/{id}"),
                "/ip4/127.0.0.1/tcp/4002".to_string(),
            ],
            ..AppConfig::default()
        };

        let peers = config.static_peers();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].0, id);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = load_config("/nonexistent/radar.json");
        assert_eq!(config, AppConfig::default());
    }
}
