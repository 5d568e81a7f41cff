//! yt-dlp search based resolver

use super::traits::ResourceResolver;
use crate::diagnostics::Diagnostics;
use crate::error::ResolveError;
use crate::tools::YtDlp;
use crate::types::{ResourceLocator, TrackQuery};
use async_trait::async_trait;

/// Resolves queries with `yt-dlp --flat-playlist --print id "ytsearch1:<query>"`
///
/// The first search hit wins. No network access happens in-process; everything goes through
/// the external binary.
pub struct YtDlpResolver {
    ytdlp: YtDlp,
}

impl YtDlpResolver {
    /// Create a resolver driving the given yt-dlp executable
    pub fn new(ytdlp: YtDlp) -> Self {
        Self { ytdlp }
    }
}

/// First plausible video id in yt-dlp `--print id` output
fn first_video_id(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| {
        !line.is_empty()
            && line
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

#[async_trait]
impl ResourceResolver for YtDlpResolver {
    async fn resolve(
        &self,
        query: &TrackQuery,
        diagnostics: &Diagnostics,
    ) -> crate::Result<ResourceLocator> {
        diagnostics.line(format!("Searching YouTube for \"{query}\""));

        let output = self
            .ytdlp
            .command()
            .args(["--no-warnings", "--flat-playlist", "--print", "id"])
            .arg(format!("ytsearch1:{}", query.as_str()))
            .output()
            .await
            .map_err(|e| ResolveError::Lookup {
                query: query.to_string(),
                reason: format!("failed to execute yt-dlp: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ResolveError::Lookup {
                query: query.to_string(),
                reason: if stderr.is_empty() {
                    format!("yt-dlp exited with {}", output.status)
                } else {
                    stderr
                },
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let id = first_video_id(&stdout).ok_or_else(|| ResolveError::NoMatch {
            query: query.to_string(),
        })?;
        Ok(ResourceLocator::youtube(id))
    }

    fn name(&self) -> &'static str {
        "yt-dlp-search"
    }
}
