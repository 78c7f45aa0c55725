use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Watches a config file for changes and sends a notification on every write.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_watcher, mut rx) = pulse_config::ConfigWatcher::spawn(pulse_config::default_path());
/// while rx.recv().await.is_some() {
///     println!("config changed — reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    // Editors often replace the file, so watch the directory and filter.
    let target = watch_dir(&path);
    if !target.is_dir() {
        // First run: `load` already fell back to defaults.
        debug!(
            "Config directory '{}' does not exist; not watching for changes",
            target.display()
        );
        return;
    }

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(target, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", target.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) => {
                use notify::EventKind::*;
                let ours = e.paths.iter().any(|p| p.file_name() == path.file_name());
                if ours && matches!(e.kind, Modify(_) | Create(_)) {
                    // A full buffer already carries a pending reload.
                    if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(()) {
                        break; // receiver dropped
                    }
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

/// Directory holding the config file (`.` for a bare file name).
fn watch_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watches_parent_directory() {
        assert_eq!(watch_dir(Path::new("/etc/pulse/pulse.toml")), Path::new("/etc/pulse"));
        assert_eq!(watch_dir(Path::new("pulse.toml")), Path::new("."));
    }

    #[tokio::test]
    async fn missing_directory_ends_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("pulse.toml");

        let (watcher, mut rx) = ConfigWatcher::spawn(&path);
        assert_eq!(watcher.path(), path.as_path());
        assert!(rx.recv().await.is_none());
    }
}
