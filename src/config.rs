//! Configuration types for playlist-dl
//!
//! Settings are layered: serde defaults, then an optional TOML file, then environment
//! variables, then command-line flags (applied by the binary).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable holding the Spotify client id
pub const ENV_SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
/// Environment variable holding the Spotify client secret
pub const ENV_SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
/// Environment variable holding the YouTube Data API key
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
/// Environment variable overriding the destination directory
pub const ENV_DOWNLOAD_DIR: &str = "PLAYLIST_DL_DOWNLOAD_DIR";
/// Environment variable overriding the bind address
pub const ENV_BIND_ADDRESS: &str = "PLAYLIST_DL_BIND";

/// Where and how audio is saved
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Destination directory for audio files (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Audio format passed to yt-dlp `--audio-format` (default: "mp3")
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            audio_format: default_audio_format(),
        }
    }
}

/// Spotify Web API access
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// Application client id (required)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Application client secret (required)
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Web API base URL (default: "https://api.spotify.com")
    #[serde(default = "default_spotify_api_url")]
    pub api_url: String,

    /// Accounts service base URL used for token requests (default: "https://accounts.spotify.com")
    #[serde(default = "default_spotify_accounts_url")]
    pub accounts_url: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_http_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_url: default_spotify_api_url(),
            accounts_url: default_spotify_accounts_url(),
            timeout: default_http_timeout(),
        }
    }
}

/// Which search backend resolves queries to videos
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBackend {
    /// `yt-dlp "ytsearch1:<query>"` (default, no API key needed)
    #[default]
    YtDlp,
    /// YouTube Data API v3 search endpoint
    YoutubeApi,
}

/// Query resolution settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Backend used to resolve queries (default: yt_dlp)
    #[serde(default)]
    pub backend: SearchBackend,

    /// YouTube Data API key (required for the youtube_api backend)
    #[serde(default)]
    pub youtube_api_key: Option<String>,

    /// YouTube Data API base URL (default: "https://www.googleapis.com")
    #[serde(default = "default_youtube_api_url")]
    pub youtube_api_url: String,

    /// Per-request timeout for the YouTube Data API in seconds (default: 30)
    #[serde(default = "default_http_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: SearchBackend::default(),
            youtube_api_key: None,
            youtube_api_url: default_youtube_api_url(),
            timeout: default_http_timeout(),
        }
    }
}

/// External tool paths
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
        }
    }
}

/// What the orchestrator does when one track fails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing track; later tracks are not attempted (default)
    #[default]
    Abort,
    /// Record the failure and continue with the next track
    Skip,
}

/// Orchestration settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Behaviour on per-track failure (default: abort)
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

/// HTTP front end settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Main configuration
///
/// Every section is optional in the TOML file:
///
/// ```toml
/// [download]
/// download_dir = "/srv/music"
/// audio_format = "opus"
///
/// [spotify]
/// client_id = "..."
/// client_secret = "..."
///
/// [search]
/// backend = "youtube_api"
/// youtube_api_key = "..."
/// timeout = 10
///
/// [pipeline]
/// on_failure = "skip"
///
/// [server]
/// bind_address = "0.0.0.0:8000"
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Destination directory and audio format
    #[serde(default)]
    pub download: DownloadConfig,

    /// Spotify Web API credentials and endpoints
    #[serde(default)]
    pub spotify: SpotifyConfig,

    /// Query resolution backend
    #[serde(default)]
    pub search: SearchConfig,

    /// External tool paths
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Orchestration behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP front end
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Empty values are ignored so that `FOO=` in a `.env` file does not clear a setting.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = get(ENV_SPOTIFY_CLIENT_ID) {
            self.spotify.client_id = Some(id);
        }
        if let Some(secret) = get(ENV_SPOTIFY_CLIENT_SECRET) {
            self.spotify.client_secret = Some(secret);
        }
        if let Some(key) = get(ENV_YOUTUBE_API_KEY) {
            self.search.youtube_api_key = Some(key);
        }
        if let Some(dir) = get(ENV_DOWNLOAD_DIR) {
            self.download.download_dir = PathBuf::from(dir);
        }
        if let Some(bind) = get(ENV_BIND_ADDRESS) {
            self.server.bind_address = bind.parse().map_err(|e| Error::Config {
                message: format!("invalid bind address {bind:?}: {e}"),
                key: Some("server.bind_address".to_string()),
            })?;
        }
        Ok(())
    }

    /// Check that the configuration can drive a pipeline
    pub fn validate(&self) -> Result<()> {
        let missing = |key: &str| Error::Config {
            message: format!("{key} is required"),
            key: Some(key.to_string()),
        };

        if self.spotify.client_id.as_deref().is_none_or(str::is_empty) {
            return Err(missing("spotify.client_id"));
        }
        if self.spotify.client_secret.as_deref().is_none_or(str::is_empty) {
            return Err(missing("spotify.client_secret"));
        }
        if self.search.backend == SearchBackend::YoutubeApi
            && self.search.youtube_api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(missing("search.youtube_api_key"));
        }
        if self.download.audio_format.trim().is_empty() {
            return Err(Error::Config {
                message: "audio format must not be empty".to_string(),
                key: Some("download.audio_format".to_string()),
            });
        }
        Ok(())
    }

    /// Destination directory
    pub fn download_dir(&self) -> &Path {
        &self.download.download_dir
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_youtube_api_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
