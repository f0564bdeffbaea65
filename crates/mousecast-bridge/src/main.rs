//! mousecast bridge entry point.
//!
//! Wires the pieces together and runs the event pump:
//!
//! ```text
//! main()
//!  └─ load_config()          -- TOML, defaults when absent
//!  └─ PortChannel::open()    -- fatal on registration failure
//!  └─ connect_to(peer)       -- best effort, logged on failure
//!  └─ event pump             -- ScriptSource (stdin) → InputEventRouter
//! ```
//!
//! Events are read as script lines from stdin (`press 10 10`, `drag 20 20`,
//! `release 20 20`, `quit`); a real deployment replaces the source with the
//! GUI toolkit's dispatcher and the loopback transport with the middleware
//! transport.

use std::path::PathBuf;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mousecast_bridge::application::router::InputEventRouter;
use mousecast_bridge::config::load_config;
use mousecast_bridge::port::channel::PortChannel;
use mousecast_bridge::port::loopback::LoopbackTransport;
use mousecast_bridge::source::script::ScriptSource;
use mousecast_bridge::source::{PointerSource, RawPointerEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config path is the single optional CLI argument.
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("mousecast.toml"));
    let config = load_config(&config_path)?;

    // Structured logging; `RUST_LOG` overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!("mousecast bridge starting");

    let surface = config.surface_size()?;
    let pacing = config.button_pacing();

    // The loopback transport stands in for the middleware; its receiver half
    // plays the remote peer and traces whatever arrives.
    let (transport, mut delivered) = LoopbackTransport::new();
    tokio::spawn(async move {
        while let Some(atoms) = delivered.recv().await {
            debug!(?atoms, "peer received");
        }
    });

    // Startup failures here are fatal: a bound name or refused registration
    // means the process must not proceed.
    let mut channel = PortChannel::new(Box::new(transport), pacing);
    channel.open(&config.port.name)?;

    if let Some(peer) = &config.port.peer {
        channel.connect_to(peer);
    }

    let mut router = InputEventRouter::new(channel, surface, config.messages.button_framing);

    let mut source = ScriptSource::stdin();
    let mut events = source.start()?;

    info!(port = %config.port.name, "ready; reading events from stdin (press/drag/release/quit)");

    loop {
        tokio::select! {
            event = events.recv() => {
                let event = event.unwrap_or(RawPointerEvent::Quit);
                router.handle_event(event).await?;
                if router.is_closed() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                router.on_quit_requested();
                break;
            }
        }
    }

    let status = router.status();
    info!(
        messages_sent = status.messages_sent,
        "mousecast bridge stopped"
    );
    Ok(())
}
