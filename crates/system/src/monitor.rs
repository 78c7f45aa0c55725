use crate::collector::Collector;
use crate::probe::HostProbe;
use pulse_core::Snapshot;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Shortest cadence the monitor will run at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Sampling intervals for a focused and a background host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub focused:   Duration,
    pub unfocused: Duration,
}

impl Cadence {
    pub fn new(focused: Duration, unfocused: Duration) -> Self {
        Self { focused, unfocused }
    }

    /// Same interval regardless of focus.
    pub fn uniform(interval: Duration) -> Self {
        Self::new(interval, interval)
    }

    fn pick(&self, focused: bool) -> Duration {
        let interval = if focused { self.focused } else { self.unfocused };
        interval.max(MIN_INTERVAL)
    }
}

#[derive(Debug)]
enum Command {
    SetCadence(Cadence),
    SetFocused(bool),
    Stop,
}

/// Control handle for a running monitor task.
///
/// The task ends on [`MonitorHandle::stop`], once every handle is dropped,
/// or once the snapshot receiver is dropped.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl MonitorHandle {
    /// Replace both intervals. Takes effect immediately if it changes the
    /// active interval.
    pub fn set_cadence(&self, cadence: Cadence) {
        self.send(Command::SetCadence(cadence));
    }

    /// Shorthand for a focus-independent cadence.
    pub fn set_interval(&self, interval: Duration) {
        self.set_cadence(Cadence::uniform(interval));
    }

    /// Switch between the focused and unfocused interval.
    pub fn set_focused(&self, focused: bool) {
        self.send(Command::SetFocused(focused));
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("Monitor already stopped; command ignored");
        }
    }
}

/// Spawn a background Tokio task that runs `collector` on the given cadence
/// (starting focused) and forwards each [`Snapshot`] through the returned channel.
///
/// The first snapshot is collected immediately. Changing the active interval
/// drops the pending tick of the old one, so only one schedule is ever live.
pub fn spawn_monitor<P>(
    mut collector: Collector<P>,
    cadence: Cadence,
) -> (MonitorHandle, mpsc::Receiver<Snapshot>)
where
    P: HostProbe + Send + 'static,
{
    let (tx, rx) = mpsc::channel(4);
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut cadence  = cadence;
        let mut focused  = true;
        let mut interval = cadence.pick(focused);
        let mut ticker   = new_ticker(Instant::now(), interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = collector.collect_all();
                    if tx.send(snapshot).await.is_err() {
                        break; // all receivers dropped
                    }
                }
                command = cmd_rx.recv() => {
                    match command {
                        Some(Command::SetCadence(next)) => cadence = next,
                        Some(Command::SetFocused(next)) => focused = next,
                        Some(Command::Stop) | None => break,
                    }
                    let next = cadence.pick(focused);
                    if next != interval {
                        info!(
                            from_ms = interval.as_millis() as u64,
                            to_ms = next.as_millis() as u64,
                            "Sampling interval changed"
                        );
                        interval = next;
                        ticker = new_ticker(Instant::now() + interval, interval);
                    }
                }
            }
        }

        debug!("Monitor task stopped");
    });

    (MonitorHandle { commands: cmd_tx }, rx)
}

fn new_ticker(start: Instant, period: Duration) -> Interval {
    let mut ticker = time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
