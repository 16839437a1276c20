use std::time::Duration;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::sync::{mpsc, watch};

use window_radar::config::{self, AppConfig};
use window_radar::geometry;
use window_radar::network::GossipClient;
use window_radar::peers::eviction;
use window_radar::protocol::{AnnounceSink, Announcer};
use window_radar::simulate;
use window_radar::ui::RadarApp;
use window_radar::{Identity, PeerSession};

#[derive(Parser)]
#[command(
    name = "window_radar",
    version,
    about = "Shows where the other windows on this machine are"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Channel name; overrides the config file
    #[arg(long)]
    channel: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Run several headless peers in this process and print what each sees
    Simulate {
        #[arg(long, default_value_t = 3)]
        peers: usize,
        /// Horizontal distance between neighbouring windows
        #[arg(long, default_value_t = 500)]
        spacing: i32,
        #[arg(long, default_value_t = 500)]
        duration_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(channel) = cli.channel {
        app_config.channel = channel;
    }

    match cli.mode {
        Some(Mode::Simulate {
            peers,
            spacing,
            duration_ms,
        }) => {
            run_simulation(&app_config, peers, spacing, Duration::from_millis(duration_ms)).await;
            Ok(())
        }
        None => run_window(app_config).await,
    }
}

async fn run_simulation(app_config: &AppConfig, peers: usize, spacing: i32, duration: Duration) {
    let reports = simulate::run(app_config, peers, spacing, duration).await;
    for report in reports {
        println!(
            "{} knows {} peer(s), drew {} this frame",
            report.local.short(),
            report.known_peers,
            report.frame.drawn
        );
        for (peer, vector) in report.vectors {
            println!(
                "  -> {} at ({}, {}), bearing {:.1}°",
                peer.short(),
                vector.dx,
                vector.dy,
                geometry::bearing(vector).degrees()
            );
        }
    }
}

async fn run_window(app_config: AppConfig) -> Result<(), eframe::Error> {
    let identity = Identity::generate();
    log::info!("Local identity {identity} on `{}`", app_config.topic_name());

    // Announcer -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(256);
    // Network + Announcer -> UI
    let (event_tx, event_rx) = mpsc::channel(1024);

    let client = GossipClient::new(
        identity,
        app_config.topic_name(),
        app_config.listen_addr.clone(),
        app_config.static_peers(),
        event_tx.clone(),
        cmd_rx,
    );
    tokio::spawn(async move {
        if let Err(err) = client.run().await {
            log::error!("Network client terminated: {err}");
        }
    });

    // UI -> Announcer: latest window geometry
    let (sample_tx, sample_rx) = watch::channel(None);
    let announcer = Announcer::new(identity, app_config.announce_interval()).spawn(
        sample_rx,
        AnnounceSink {
            local: event_tx,
            transport: cmd_tx,
        },
    );

    let session = PeerSession::new(identity, app_config.anchor, app_config.render)
        .with_eviction(eviction::from_idle_timeout(app_config.eviction.idle_timeout()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Window Radar {}", identity.short()))
            .with_inner_size([780.0, 320.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Window Radar",
        options,
        Box::new(move |cc| Ok(Box::new(RadarApp::new(cc, session, sample_tx, event_rx)))),
    );

    announcer.stop().await;
    result
}
