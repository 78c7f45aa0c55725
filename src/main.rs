//! pulse — samples CPU, memory and disk usage and streams snapshots as JSON lines.
//!
//! Run with:  `RUST_LOG=info pulse`
//!
//! Writing `focus` or `blur` to stdin switches between the focused and
//! unfocused sampling intervals.

use anyhow::Result;
use pulse_config::{default_path, load as load_config, ConfigWatcher, PulseConfig};
use pulse_system::{spawn_monitor, Cadence, Collector};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("pulse v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = default_path();
    let config = load_config(&config_path).unwrap_or_else(|e| {
        warn!("Config load failed: {e}; using defaults.");
        PulseConfig::default()
    });

    let collector = Collector::new(config.sampling.history_len);
    let (monitor, mut snapshots) = spawn_monitor(collector, cadence(&config));
    let (_watcher, mut reloads) = ConfigWatcher::spawn(&config_path);

    let mut focus_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else { break };
                let mut out = std::io::stdout().lock();
                serde_json::to_writer(&mut out, &snapshot)?;
                writeln!(out)?;
            }
            Some(()) = reloads.recv() => match load_config(&config_path) {
                Ok(config) => {
                    info!("Config reloaded");
                    monitor.set_cadence(cadence(&config));
                }
                Err(e) => warn!("Config reload failed: {e}"),
            },
            line = focus_lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_host_input(&line) {
                    HostInput::Focus(focused) => monitor.set_focused(focused),
                    HostInput::Blank => {}
                    HostInput::Unknown => warn!("Unknown stdin command '{}'", line.trim()),
                },
                // Sampling continues; only focus input stops.
                Ok(None) => {
                    debug!("stdin reached EOF; focus commands disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("stdin closed: {e}");
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    monitor.stop();
    Ok(())
}

fn cadence(config: &PulseConfig) -> Cadence {
    Cadence::new(config.sampling.interval(), config.sampling.unfocused_interval())
}

/// One line written to stdin by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostInput {
    Focus(bool),
    Blank,
    Unknown,
}

fn parse_host_input(line: &str) -> HostInput {
    match line.trim() {
        "focus" => HostInput::Focus(true),
        "blur" => HostInput::Focus(false),
        "" => HostInput::Blank,
        _ => HostInput::Unknown,
    }
}
