//! Core types for playlist-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::error::{Error, ExtractError};

/// Kind of catalog object an input reference points at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A user or editorial playlist (many tracks)
    Playlist,
    /// An album (many tracks)
    Album,
    /// A single track
    Track,
}

impl SourceKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "playlist" => Some(SourceKind::Playlist),
            "album" => Some(SourceKind::Album),
            "track" => Some(SourceKind::Track),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceKind::Playlist => "playlist",
            SourceKind::Album => "album",
            SourceKind::Track => "track",
        };
        f.write_str(name)
    }
}

/// A parsed input reference identifying a playlist, album or track in the catalog
///
/// Accepts share links (`https://open.spotify.com/playlist/<id>?si=...`, optionally with
/// an `intl-xx` locale segment or an `embed` prefix) and URIs (`spotify:track:<id>`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceReference {
    /// What the reference points at
    pub kind: SourceKind,
    /// Catalog identifier (base-62)
    pub id: String,
}

const SPOTIFY_WEB_HOSTS: &[&str] = &["open.spotify.com", "play.spotify.com"];

impl SourceReference {
    /// Parse a caller-supplied reference string
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidReference`] when the input is empty, is not a Spotify
    /// link or URI, names an unsupported object type, or carries a malformed identifier.
    pub fn parse(input: &str) -> Result<Self, ExtractError> {
        let trimmed = input.trim();
        let invalid = |reason: &str| ExtractError::InvalidReference {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("reference is empty"));
        }

        let (kind_segment, id) = if let Some(rest) = trimmed.strip_prefix("spotify:") {
            let mut parts = rest.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(kind), Some(id), None) => (kind.to_string(), id.to_string()),
                _ => return Err(invalid("expected spotify:<kind>:<id>")),
            }
        } else {
            let url = url::Url::parse(trimmed).map_err(|_| invalid("not a URL or spotify URI"))?;
            let host = url.host_str().unwrap_or_default();
            if !SPOTIFY_WEB_HOSTS.contains(&host) {
                return Err(invalid("host is not open.spotify.com"));
            }

            let mut segments = url
                .path_segments()
                .map(|s| s.filter(|seg| !seg.is_empty()).collect::<Vec<_>>())
                .unwrap_or_default();
            if segments.first().is_some_and(|s| s.starts_with("intl-")) {
                segments.remove(0);
            }
            if segments.first() == Some(&"embed") {
                segments.remove(0);
            }
            match segments.as_slice() {
                [kind, id, ..] => (kind.to_string(), id.to_string()),
                _ => return Err(invalid("expected /<kind>/<id> path")),
            }
        };

        let kind = SourceKind::from_segment(&kind_segment)
            .ok_or_else(|| invalid(&format!("unsupported object type {kind_segment:?}")))?;

        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("identifier must be base-62"));
        }

        Ok(Self { kind, id })
    }
}

impl std::str::FromStr for SourceReference {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "spotify:{}:{}", self.kind, self.id)
    }
}

/// Searchable text derived from one track, e.g. `"Artist A - Song 1"`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TrackQuery(pub String);

impl TrackQuery {
    /// Build a query from a track title and its credited artists
    ///
    /// Artists are joined with `", "`; a track without artists yields the bare title.
    pub fn from_track<S: AsRef<str>>(title: &str, artists: &[S]) -> Self {
        let artists = artists
            .iter()
            .map(|a| a.as_ref().trim())
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>();
        if artists.is_empty() {
            Self(title.trim().to_string())
        } else {
            Self(format!("{} - {}", artists.join(", "), title.trim()))
        }
    }

    /// Borrow the query text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackQuery {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// URL of a matched audio resource on the video platform
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ResourceLocator(pub String);

impl ResourceLocator {
    /// Locator for a YouTube video id
    pub fn youtube(video_id: &str) -> Self {
        Self(format!("https://www.youtube.com/watch?v={video_id}"))
    }

    /// Borrow the URL text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file written by the fetcher
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FetchedFile {
    /// Full path of the persisted audio file
    pub path: PathBuf,
}

/// Pipeline stage, used to attribute failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Deriving queries from the input reference
    Extract,
    /// Searching for a matching resource
    Resolve,
    /// Downloading and saving audio
    Fetch,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Resolve => "resolve",
            Stage::Fetch => "fetch",
        };
        f.write_str(name)
    }
}

/// A recorded stage failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StageFailure {
    /// Stage that failed
    pub stage: Stage,
    /// Machine-readable error code (see [`crate::ToHttpStatus`])
    pub code: String,
    /// HTTP status the failure maps to
    pub status: u16,
    /// Human-readable reason
    pub reason: String,
}

impl StageFailure {
    /// Capture an error raised by `stage`
    pub fn new(stage: Stage, error: &Error) -> Self {
        use crate::error::ToHttpStatus;
        Self {
            stage,
            code: error.error_code().to_string(),
            status: error.status_code(),
            reason: error.to_string(),
        }
    }
}

/// Outcome of processing one query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Query resolved and audio saved
    Fetched {
        /// 1-based position of the track in the source
        position: usize,
        /// Query that was searched
        query: TrackQuery,
        /// Matched resource
        locator: ResourceLocator,
        /// File that was written
        file: FetchedFile,
    },
    /// Resolution or fetch failed for this query
    Failed {
        /// 1-based position of the track in the source
        position: usize,
        /// Query that was searched
        query: TrackQuery,
        /// Matched resource, if resolution succeeded before the fetch failed
        locator: Option<ResourceLocator>,
        /// What went wrong
        failure: StageFailure,
    },
}

impl ItemOutcome {
    /// Whether this item produced a file
    pub fn is_fetched(&self) -> bool {
        matches!(self, ItemOutcome::Fetched { .. })
    }
}

/// Result of one pipeline run for one input reference
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PipelineReport {
    /// Input reference as supplied by the caller
    pub input: String,
    /// Queries derived from the input, in source order
    pub queries: Vec<TrackQuery>,
    /// One entry per attempted item, in source order
    pub items: Vec<ItemOutcome>,
    /// Set when extraction itself failed (no items were attempted)
    pub extraction_failure: Option<StageFailure>,
    /// Whether processing stopped before every query was attempted
    pub aborted: bool,
    /// When processing started
    pub started_at: DateTime<Utc>,
    /// When processing finished
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    /// Number of files written
    pub fn fetched_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_fetched()).count()
    }

    /// First failure in the report, extraction failures first
    pub fn failure(&self) -> Option<&StageFailure> {
        self.extraction_failure.as_ref().or_else(|| {
            self.items.iter().find_map(|item| match item {
                ItemOutcome::Failed { failure, .. } => Some(failure),
                ItemOutcome::Fetched { .. } => None,
            })
        })
    }

    /// True when every derived query produced a file
    pub fn is_success(&self) -> bool {
        self.failure().is_none() && self.fetched_count() == self.queries.len()
    }
}
