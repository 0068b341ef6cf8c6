//! # lb-runner
//!
//! Main entry point for the live-board update bus.
//!
//! Loads a JSON configuration file, starts the bus (bootstrap fetch, event
//! stream tailer, gateway liveness prober), and logs every published event
//! and connectivity transition until Ctrl+C — a stand-in for the UI layer
//! that consumes the same published surface.
//!
//! # Usage
//!
//! ```bash
//! lb-runner config.json --log-level info
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lb_bus::{BusEvent, UpdateBus};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Live-board update bus runner.
#[derive(Parser)]
#[command(name = "lb-runner", about = "Live-board update bus runner")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    lb_core::logging::init_logging(&cli.log_level, cli.log_dir.as_deref(), "lb-runner");

    info!("lb-runner starting — config={}, log_level={}", cli.config.display(), cli.log_level,);

    // 2. Load configuration and start the bus
    let config = lb_core::config::load_config(&cli.config)?;
    info!("config loaded — base_url={}", config.base_url);

    let bus = UpdateBus::new(config)?;
    bus.ensure_started();

    // 3. Observe the published surface until shutdown
    let mut events = bus.subscribe()?;
    let mut connected = bus.watch_connected();

    let observer = tokio::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(BusEvent::Snapshot(snap)) => {
                        info!("snapshot update ({} keys)", snap.len());
                    }
                    Ok(BusEvent::Generic { kind, fields }) => {
                        info!("{kind} update: {}", serde_json::Value::Object(fields));
                    }
                    Ok(BusEvent::Heartbeat) => {}
                    Err(RecvError::Lagged(n)) => {
                        warn!("observer lagged — {n} event(s) dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                changed = connected.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let up = *connected.borrow_and_update();
                    info!("connectivity: {}", if up { "online" } else { "offline" });
                }
            }
        }
    });

    // 4. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    // 5. Tear down: stream, timers, then the notification channel
    bus.dispose().await;
    let _ = observer.await;

    info!("bus disposed — goodbye");
    Ok(())
}
