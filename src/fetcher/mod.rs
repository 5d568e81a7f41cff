//! Content fetching
//!
//! [`ContentFetcher`] persists the audio for one resource locator. [`YtDlpFetcher`] extracts
//! audio with the external `yt-dlp` binary (which in turn relies on ffmpeg for conversion).

mod traits;
mod ytdlp;

pub use traits::ContentFetcher;
pub use ytdlp::YtDlpFetcher;
