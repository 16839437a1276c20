use std::error::Error;
use std::time::Duration;

use futures::StreamExt;
use libp2p::gossipsub;
use libp2p::swarm::SwarmEvent;
use libp2p::{Multiaddr, PeerId, Swarm, SwarmBuilder, mdns, noise, tcp, yamux};
use tokio::sync::mpsc;

use crate::common::{Identity, NetworkCommand, NetworkEvent};
use crate::protocol::wire;

use super::behavior::{RadarBehavior, RadarBehaviorEvent, build_behavior};
use super::forward;

const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Gossipsub transport. Listens on loopback so only processes on this machine
/// can link up.
pub struct GossipClient {
    local: Identity,
    topic_name: String,
    listen_addr: String,
    static_peers: Vec<(PeerId, Multiaddr)>,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
}

impl GossipClient {
    pub fn new(
        local: Identity,
        topic_name: impl Into<String>,
        listen_addr: impl Into<String>,
        static_peers: Vec<(PeerId, Multiaddr)>,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        Self {
            local,
            topic_name: topic_name.into(),
            listen_addr: listen_addr.into(),
            static_peers,
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        // Announcements are tiny and frequent, so Nagle stays off.
        let mut swarm = SwarmBuilder::with_new_identity()
            .with_tokio()
            .with_tcp(
                tcp::Config::default().nodelay(true),
                noise::Config::new,
                yamux::Config::default,
            )?
            .with_behaviour(build_behavior)?
            .with_swarm_config(|config| config.with_idle_connection_timeout(IDLE_CONNECTION_TIMEOUT))
            .build();
        log::info!(
            "Link PeerID: {:?} (radar identity {})",
            swarm.local_peer_id(),
            self.local
        );

        let topic = gossipsub::IdentTopic::new(&self.topic_name);
        swarm.behaviour_mut().gossipsub.subscribe(&topic)?;
        swarm.listen_on(self.listen_addr.parse()?)?;

        for (peer_id, addr) in std::mem::take(&mut self.static_peers) {
            log::info!("Adding static peer {peer_id} at {addr}");
            swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
            if let Err(err) = swarm.dial(addr) {
                log::warn!("Failed to dial static peer {peer_id}: {err}");
            }
        }

        log::info!("Joined topic `{}`", self.topic_name);

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command, &mut swarm, &topic),
                        None => break,
                    }
                }
                event = swarm.select_next_some() => {
                    if !self.handle_swarm_event(event, &mut swarm) {
                        log::info!("Event receiver gone; leaving topic `{}`", self.topic_name);
                        break;
                    }
                }
            }
        }

        log::info!("Network event loop stopped");
        Ok(())
    }

    fn handle_command(
        &mut self,
        command: NetworkCommand,
        swarm: &mut Swarm<RadarBehavior>,
        topic: &gossipsub::IdentTopic,
    ) {
        match command {
            NetworkCommand::Publish(message) => {
                let payload = match wire::encode(&message) {
                    Ok(payload) => payload,
                    Err(err) => {
                        log::warn!("Failed to serialize announcement: {err}");
                        return;
                    }
                };

                // Publishing with nobody subscribed fails on every tick until
                // the first peer shows up; keep that out of the default log.
                if let Err(err) = swarm
                    .behaviour_mut()
                    .gossipsub
                    .publish(topic.clone(), payload)
                {
                    log::debug!("Publish error: {err:?}");
                }
            }
        }
    }

    /// Returns `false` once nobody is left to receive events.
    fn handle_swarm_event(
        &mut self,
        event: SwarmEvent<RadarBehaviorEvent>,
        swarm: &mut Swarm<RadarBehavior>,
    ) -> bool {
        match event {
            SwarmEvent::Behaviour(RadarBehaviorEvent::Gossipsub(gossipsub::Event::Message {
                message,
                ..
            })) => match wire::accept_inbound(self.local, &message.data) {
                Some(announcement) => {
                    forward(&self.event_sender, NetworkEvent::PeerReported(announcement))
                }
                None => true,
            },
            SwarmEvent::Behaviour(RadarBehaviorEvent::Mdns(mdns::Event::Discovered(list))) => {
                let mut open = true;
                for (peer_id, addr) in list {
                    log::debug!("mDNS discovered {peer_id} at {addr}");
                    swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
                    open &= forward(&self.event_sender, NetworkEvent::LinkUp(peer_id.to_string()));
                }
                open
            }
            SwarmEvent::Behaviour(RadarBehaviorEvent::Mdns(mdns::Event::Expired(list))) => {
                let mut open = true;
                for (peer_id, _) in list {
                    swarm
                        .behaviour_mut()
                        .gossipsub
                        .remove_explicit_peer(&peer_id);
                    open &= forward(&self.event_sender, NetworkEvent::LinkDown(peer_id.to_string()));
                }
                open
            }
            SwarmEvent::NewListenAddr { address, .. } => {
                log::info!("Listening on {address:?}");
                forward(&self.event_sender, NetworkEvent::Listening(address.to_string()))
            }
            SwarmEvent::ConnectionEstablished { peer_id, .. } => {
                log::debug!("Connected to {peer_id}");
                true
            }
            SwarmEvent::ConnectionClosed { peer_id, cause, .. } => {
                log::debug!("Connection to {peer_id} closed: {cause:?}");
                true
            }
            _ => true,
        }
    }
}
