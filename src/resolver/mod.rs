//! Query resolution
//!
//! [`ResourceResolver`] maps one query string to one video URL. Two backends are provided:
//!
//! - [`YtDlpResolver`]: asks `yt-dlp` for the first `ytsearch` hit (no API key needed)
//! - [`YouTubeApiResolver`]: calls the YouTube Data API v3 search endpoint

mod traits;
mod youtube_api;
mod ytdlp;

pub use traits::ResourceResolver;
pub use youtube_api::YouTubeApiResolver;
pub use ytdlp::YtDlpResolver;
