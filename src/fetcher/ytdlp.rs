//! yt-dlp based audio fetcher

use super::traits::ContentFetcher;
use crate::diagnostics::Diagnostics;
use crate::error::FetchError;
use crate::tools::YtDlp;
use crate::types::{FetchedFile, ResourceLocator};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Output template: files are named after the video title
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Extracts audio with `yt-dlp -x --audio-format <fmt>`
///
/// The final path is read back with `--print after_move:filepath`, so the returned
/// [`FetchedFile`] names the file that actually landed on disk after conversion.
pub struct YtDlpFetcher {
    ytdlp: YtDlp,
    audio_format: String,
}

impl YtDlpFetcher {
    /// Create a fetcher producing `audio_format` files (e.g. "mp3", "opus", "m4a")
    pub fn new(ytdlp: YtDlp, audio_format: impl Into<String>) -> Self {
        Self {
            ytdlp,
            audio_format: audio_format.into(),
        }
    }
}

/// `-o` value for `destination`
///
/// yt-dlp reads the whole `-o` value as a template, so `%` in the directory is doubled.
fn output_template(destination: &Path) -> PathBuf {
    match destination.to_str() {
        Some(dir) if dir.contains('%') => {
            PathBuf::from(dir.replace('%', "%%")).join(OUTPUT_TEMPLATE)
        }
        _ => destination.join(OUTPUT_TEMPLATE),
    }
}

/// Last non-empty stdout line, which `--print after_move:filepath` emits
fn printed_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(PathBuf::from)
}

#[async_trait]
impl ContentFetcher for YtDlpFetcher {
    async fn fetch(
        &self,
        locator: &ResourceLocator,
        destination: &Path,
        diagnostics: &Diagnostics,
    ) -> crate::Result<FetchedFile> {
        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|e| FetchError::Destination {
                path: destination.to_path_buf(),
                reason: e.to_string(),
            })?;

        diagnostics.line(format!("Downloading audio from {locator}"));

        let output = self
            .ytdlp
            .command()
            .args(["--no-playlist", "--no-warnings", "--no-progress", "-x"])
            .arg("--audio-format")
            .arg(&self.audio_format)
            .arg("-o")
            .arg(output_template(destination))
            .args(["--print", "after_move:filepath"])
            .arg(locator.as_str())
            .output()
            .await
            .map_err(|e| FetchError::Spawn {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                locator = %locator,
                code = ?output.status.code(),
                "yt-dlp download failed"
            );
            return Err(FetchError::ToolFailed {
                locator: locator.to_string(),
                code: output.status.code(),
                stderr,
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = printed_path(&stdout).ok_or_else(|| FetchError::MissingOutput {
            locator: locator.to_string(),
        })?;

        diagnostics.line(format!("Saved {}", path.display()));
        Ok(FetchedFile { path })
    }

    fn name(&self) -> &'static str {
        "yt-dlp-audio"
    }
}
