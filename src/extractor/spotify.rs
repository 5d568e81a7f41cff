//! Spotify Web API extractor

use super::traits::MetadataExtractor;
use crate::config::SpotifyConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, ExtractError, Result};
use crate::types::{SourceKind, SourceReference, TrackQuery};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Page size for playlist item requests (API maximum)
const PLAYLIST_PAGE_LIMIT: &str = "100";
/// Page size for album track requests (API maximum)
const ALBUM_PAGE_LIMIT: &str = "50";

/// Extracts track queries from Spotify playlists, albums and tracks
///
/// Authenticates with the client-credentials grant on every call; no token outlives the
/// request that obtained it.
///
/// # Examples
///
/// ```no_run
/// use playlist_dl::config::SpotifyConfig;
/// use playlist_dl::extractor::{MetadataExtractor, SpotifyExtractor};
/// use playlist_dl::Diagnostics;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SpotifyConfig {
///     client_id: Some("id".into()),
///     client_secret: Some("secret".into()),
///     ..Default::default()
/// };
/// let extractor = SpotifyExtractor::new(&config)?;
/// let diagnostics = Diagnostics::new();
/// let queries = extractor
///     .extract("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC", &diagnostics)
///     .await?;
/// println!("{queries:?}");
/// # Ok(())
/// # }
/// ```
pub struct SpotifyExtractor {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    api_url: String,
    accounts_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    // null for entries removed from the catalog
    #[serde(default)]
    track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    name: String,
    // episodes carry no artists
    #[serde(default)]
    artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

impl TrackObject {
    fn query(&self) -> TrackQuery {
        let artists = self.artists.iter().map(|a| a.name.as_str()).collect::<Vec<_>>();
        TrackQuery::from_track(&self.name, &artists)
    }
}

impl SpotifyExtractor {
    /// Build an extractor from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when credentials are missing and [`Error::Network`] when the
    /// HTTP client cannot be constructed.
    pub fn new(config: &SpotifyConfig) -> Result<Self> {
        let required = |value: &Option<String>, key: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config {
                    message: format!("{key} is required"),
                    key: Some(key.to_string()),
                })
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("playlist-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            client_id: required(&config.client_id, "spotify.client_id")?,
            client_secret: required(&config.client_secret, "spotify.client_secret")?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<TokenErrorBody>(&body)
                .map(|e| e.error_description.unwrap_or(e.error))
                .unwrap_or_else(|_| format!("token endpoint returned {status}"));
            return Err(ExtractError::Unauthorized(reason).into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Malformed(format!("token response: {e}")))?;
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        tracing::debug!(url = %url, "spotify request");
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.trim().to_string());
            if status == StatusCode::UNAUTHORIZED {
                return Err(ExtractError::Unauthorized(message).into());
            }
            return Err(ExtractError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response
            .json()
            .await
            .map_err(|e| ExtractError::Malformed(e.to_string()).into())
    }

    async fn playlist_queries(
        &self,
        token: &str,
        id: &str,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<TrackQuery>> {
        let mut queries = Vec::new();
        let mut position = 0usize;
        let mut url = format!("{}/v1/playlists/{}/tracks", self.api_url, id);
        let mut query: &[(&str, &str)] = &[("limit", PLAYLIST_PAGE_LIMIT)];

        loop {
            let page: Page<PlaylistItem> = self.get_json(token, &url, query).await?;
            for item in page.items {
                position += 1;
                match item.track {
                    Some(track) => queries.push(track.query()),
                    None => diagnostics.warn(format!(
                        "Skipping unavailable playlist entry at position {position}"
                    )),
                }
            }
            match page.next {
                // `next` already carries offset and limit
                Some(next) => {
                    url = next;
                    query = &[];
                }
                None => break,
            }
        }
        Ok(queries)
    }

    async fn album_queries(&self, token: &str, id: &str) -> Result<Vec<TrackQuery>> {
        let mut queries = Vec::new();
        let mut url = format!("{}/v1/albums/{}/tracks", self.api_url, id);
        let mut query: &[(&str, &str)] = &[("limit", ALBUM_PAGE_LIMIT)];

        loop {
            let page: Page<TrackObject> = self.get_json(token, &url, query).await?;
            queries.extend(page.items.iter().map(TrackObject::query));
            match page.next {
                Some(next) => {
                    url = next;
                    query = &[];
                }
                None => break,
            }
        }
        Ok(queries)
    }

    async fn track_query(&self, token: &str, id: &str) -> Result<TrackQuery> {
        let url = format!("{}/v1/tracks/{}", self.api_url, id);
        let track: TrackObject = self.get_json(token, &url, &[]).await?;
        Ok(track.query())
    }
}

#[async_trait]
impl MetadataExtractor for SpotifyExtractor {
    async fn extract(
        &self,
        input: &str,
        diagnostics: &Diagnostics,
    ) -> crate::Result<Vec<TrackQuery>> {
        let reference = SourceReference::parse(input)?;
        diagnostics.line(format!("Reading {} {} from Spotify", reference.kind, reference.id));

        let token = self.access_token().await?;
        let queries = match reference.kind {
            SourceKind::Playlist => self.playlist_queries(&token, &reference.id, diagnostics).await?,
            SourceKind::Album => self.album_queries(&token, &reference.id).await?,
            SourceKind::Track => vec![self.track_query(&token, &reference.id).await?],
        };

        diagnostics.line(format!("Found {} track(s)", queries.len()));
        Ok(queries)
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
