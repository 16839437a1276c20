use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use window_radar::common::{NetworkCommand, NetworkEvent};
use window_radar::config::AppConfig;
use window_radar::geometry::{self, AnchorConfig, Point, Vector};
use window_radar::network::{LocalBus, LocalBusClient};
use window_radar::protocol::wire;
use window_radar::simulate;
use window_radar::{Identity, PeerMessage, PeerState};

fn window(x: i32) -> PeerState {
    PeerState {
        x,
        y: 0,
        width: 300,
        height: 220,
        offset: 20,
    }
}

fn fast_config() -> AppConfig {
    AppConfig {
        channel: format!("test-{}", Identity::generate()),
        announce_interval_ms: 5,
        ..AppConfig::default()
    }
}

async fn next_report(events: &mut mpsc::Receiver<NetworkEvent>) -> PeerMessage {
    loop {
        let event = timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for a peer report")
            .expect("event channel closed");
        if let NetworkEvent::PeerReported(message) = event {
            return message;
        }
    }
}

#[test]
fn test_two_windows_scenario() {
    let config = AnchorConfig::default();
    let a = window(0);
    let b = window(500);

    assert_eq!(geometry::anchor(&config, &a), Point { x: 200, y: 120 });
    assert_eq!(geometry::anchor(&config, &b), Point { x: 700, y: 120 });

    let v = geometry::relative_vector(&config, &a, &b);
    assert_eq!(v, Vector { dx: 500, dy: 0 });
    assert_eq!(geometry::bearing(v).degrees(), 0.0);
}

#[tokio::test]
async fn test_simulated_peers_agree_on_layout() {
    let reports = simulate::run(&fast_config(), 3, 500, Duration::from_millis(300)).await;
    assert_eq!(reports.len(), 3);

    let by_peer: HashMap<Identity, HashMap<Identity, Vector>> = reports
        .iter()
        .map(|report| (report.local, report.vectors.iter().copied().collect()))
        .collect();

    for report in &reports {
        assert_eq!(report.known_peers, 3, "peer {} saw {:?}", report.local, report.vectors);
        assert_eq!(report.vectors.len(), 2);
        for (other, vector) in &report.vectors {
            assert_eq!(vector.dy, 0);
            assert!(matches!(vector.dx.abs(), 500 | 1000));
            assert_eq!(by_peer[other][&report.local], -*vector);
        }
    }
}

#[tokio::test]
async fn test_local_bus_client_filters_inbound() {
    let bus = LocalBus::default();
    let local = Identity::generate();
    let (event_tx, mut event_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let client = LocalBusClient::new(local, "radar", bus.clone(), event_tx, cmd_rx);
    let task = tokio::spawn(client.run());

    // listening notice first, so the client has subscribed before we publish
    let first = timeout(Duration::from_secs(2), event_rx.recv()).await.unwrap();
    assert!(matches!(first, Some(NetworkEvent::Listening(_))));

    let (raw, _) = bus.join("radar");
    let stranger = PeerMessage::new(Identity::generate(), window(500));

    raw.send(b"{\"sender\":\"nope\"}".to_vec()).unwrap();
    cmd_tx
        .send(NetworkCommand::Publish(PeerMessage::new(local, window(0))))
        .await
        .unwrap();
    raw.send(wire::encode(&stranger).unwrap()).unwrap();

    assert_eq!(next_report(&mut event_rx).await, stranger);
    assert!(event_rx.try_recv().is_err());

    drop(cmd_tx);
    timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_channels_are_isolated_by_name() {
    let bus = LocalBus::default();
    let (event_tx, mut event_rx) = mpsc::channel(16);
    let (_cmd_tx, cmd_rx) = mpsc::channel(16);
    let client = LocalBusClient::new(Identity::generate(), "desk-a", bus.clone(), event_tx, cmd_rx);
    tokio::spawn(client.run());

    let first = timeout(Duration::from_secs(2), event_rx.recv()).await.unwrap();
    assert!(matches!(first, Some(NetworkEvent::Listening(_))));

    let (other_channel, _) = bus.join("desk-b");
    let (same_channel, _) = bus.join("desk-a");
    let wrong = PeerMessage::new(Identity::generate(), window(1));
    let right = PeerMessage::new(Identity::generate(), window(2));

    // nobody listens on desk-b, so this send may report no receivers
    let _ = other_channel.send(wire::encode(&wrong).unwrap());
    same_channel.send(wire::encode(&right).unwrap()).unwrap();

    assert_eq!(next_report(&mut event_rx).await, right);
}

#[tokio::test]
async fn test_publish_continues_while_events_go_unread() {
    let bus = LocalBus::default();
    let local = Identity::generate();
    let (event_tx, mut event_rx) = mpsc::channel(2);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (raw, mut observer) = bus.join("radar");
    let task = tokio::spawn(LocalBusClient::new(local, "radar", bus.clone(), event_tx, cmd_rx).run());

    let first = timeout(Duration::from_secs(2), event_rx.recv()).await.unwrap();
    assert!(matches!(first, Some(NetworkEvent::Listening(_))));

    // fill the event queue and keep going; nothing reads it from here on
    for x in 0..5 {
        let other = PeerMessage::new(Identity::generate(), window(x));
        raw.send(wire::encode(&other).unwrap()).unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    cmd_tx
        .send(NetworkCommand::Publish(PeerMessage::new(local, window(0))))
        .await
        .unwrap();

    let own = timeout(Duration::from_secs(2), async {
        loop {
            let payload = observer.recv().await.unwrap();
            let message = wire::decode(&payload).unwrap();
            if message.sender == local {
                return message;
            }
        }
    })
    .await
    .expect("own announcement never reached the channel");
    assert_eq!(own.data, window(0));

    drop(cmd_tx);
    timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(event_rx.len(), 2);
}
