//! Metadata extraction
//!
//! The [`MetadataExtractor`] trait is the seam between the orchestrator and the source
//! catalog. [`SpotifyExtractor`] talks to the Spotify Web API using the client-credentials
//! flow and understands playlists, albums and single tracks.

mod spotify;
mod traits;

pub use spotify::SpotifyExtractor;
pub use traits::MetadataExtractor;
