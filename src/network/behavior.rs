use std::error::Error;
use std::time::Duration;

use libp2p::gossipsub;
use libp2p::mdns;
use libp2p::swarm::NetworkBehaviour;
use libp2p::identity;

#[derive(NetworkBehaviour)]
pub struct RadarBehavior {
    pub gossipsub: gossipsub::Behaviour,
    pub mdns: mdns::tokio::Behaviour,
}

/// Signed gossipsub plus mDNS for discovering the other processes on this
/// machine. The caller subscribes to its topic once the swarm exists.
pub fn build_behavior(
    local_key: &identity::Keypair,
) -> Result<RadarBehavior, Box<dyn Error + Send + Sync>> {
    // Announcements repeat byte-for-byte while a window sits still, so message
    // ids must come from the default source + sequence number, not the payload.
    let gossipsub_config = gossipsub::ConfigBuilder::default()
        .heartbeat_interval(Duration::from_secs(1))
        .validation_mode(gossipsub::ValidationMode::Strict)
        .build()?;

    let gossipsub = gossipsub::Behaviour::new(
        gossipsub::MessageAuthenticity::Signed(local_key.clone()),
        gossipsub_config,
    )?;

    let mdns = mdns::tokio::Behaviour::new(
        mdns::Config::default(),
        local_key.public().to_peer_id(),
    )?;

    Ok(RadarBehavior { gossipsub, mdns })
}
