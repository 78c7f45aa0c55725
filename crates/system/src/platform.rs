//! Which filesystem to watch, per OS and runtime environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Set (non-empty) inside a cloud development container.
pub const CLOUD_CONTAINER_VAR: &str = "CODESPACES";
/// Workspace folder of the cloud development container.
pub const WORKSPACE_FOLDER_VAR: &str = "CODESPACE_VSCODE_FOLDER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }
}

/// Environment inputs to [`resolve_target`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMarkers {
    pub cloud_container: bool,
    pub workspace_folder: Option<String>,
    pub home_dir: Option<PathBuf>,
}

impl EnvMarkers {
    /// Read the markers from the process environment. Not cached.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var_os(CLOUD_CONTAINER_VAR),
            std::env::var_os(WORKSPACE_FOLDER_VAR),
            dirs::home_dir(),
        )
    }

    /// Interpret raw variable values. Empty values count as unset.
    pub fn from_vars(
        cloud_container: Option<OsString>,
        workspace_folder: Option<OsString>,
        home_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            cloud_container: cloud_container.is_some_and(|v| !v.is_empty()),
            workspace_folder: workspace_folder
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string_lossy().into_owned()),
            home_dir,
        }
    }
}

/// Monitored path plus its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskTarget {
    /// `None` disables disk monitoring.
    pub path: Option<PathBuf>,
    pub label: &'static str,
}

pub fn resolve_target(platform: Platform, env: &EnvMarkers) -> DiskTarget {
    let (path, label) = match (platform, env.cloud_container) {
        (Platform::Windows, true) => (env.home_dir.as_deref().map(absolute), "Disk Usage (Home)"),
        (Platform::Windows, false) => (Some(PathBuf::from("C:\\")), "Disk Usage (C:)"),
        (Platform::MacOs, _) => (Some(PathBuf::from("/")), "Disk Usage (/)"),
        (Platform::Linux, true) => {
            let folder = env.workspace_folder.as_deref().unwrap_or("/");
            (Some(absolute(Path::new(folder))), "Disk Usage (Workspace)")
        }
        (Platform::Linux, false) => (Some(PathBuf::from("/")), "Disk Usage (/)"),
        (Platform::Other, _) => (None, "Disk Usage"),
    };
    DiskTarget { path, label }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
