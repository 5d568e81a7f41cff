//! External tool discovery
//!
//! The resolver and fetcher both drive the `yt-dlp` binary. [`YtDlp`] locates it once at
//! startup, either from an explicit path in [`ToolsConfig`] or by searching `PATH`.

use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Name of the yt-dlp executable searched for in `PATH`
pub const YTDLP_BINARY: &str = "yt-dlp";

/// Handle to a located yt-dlp executable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YtDlp {
    binary_path: PathBuf,
}

impl YtDlp {
    /// Use an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which(YTDLP_BINARY).ok().map(Self::new)
    }

    /// Locate yt-dlp according to configuration
    ///
    /// An explicit `ytdlp_path` wins; otherwise `PATH` is searched when `search_path` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalTool`] when the configured path does not exist or no binary
    /// could be found.
    pub fn discover(tools: &ToolsConfig) -> Result<Self> {
        if let Some(path) = &tools.ytdlp_path {
            if !path.exists() {
                return Err(Error::ExternalTool(format!(
                    "configured yt-dlp path {} does not exist",
                    path.display()
                )));
            }
            return Ok(Self::new(path.clone()));
        }

        if tools.search_path {
            return Self::from_path().ok_or_else(|| {
                Error::ExternalTool(
                    "yt-dlp not found in PATH. Install it or set tools.ytdlp_path.".to_string(),
                )
            });
        }

        Err(Error::ExternalTool(
            "no yt-dlp path configured and PATH search is disabled".to_string(),
        ))
    }

    /// Path of the executable
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// A fresh command for this executable
    ///
    /// The child is killed if the returned future is dropped (e.g. the client disconnects).
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.binary_path);
        command.kill_on_drop(true);
        command
    }
}
