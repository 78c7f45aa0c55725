pub mod schema;
pub mod watcher;

pub use schema::{PulseConfig, SamplingConfig};
pub use watcher::ConfigWatcher;

use pulse_core::{PulseError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `PulseConfig::default()` if
/// the file doesn't exist so the sampler always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<PulseConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(PulseConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| PulseError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: PulseConfig =
        toml::from_str(&raw).map_err(|e| PulseError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("pulse").join("pulse.toml")
}
