//! YouTube Data API v3 resolver

use super::traits::ResourceResolver;
use crate::config::SearchConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, ResolveError, Result};
use crate::types::{ResourceLocator, TrackQuery};
use async_trait::async_trait;
use serde::Deserialize;

/// Resolves queries with `GET /youtube/v3/search?type=video&maxResults=1`
pub struct YouTubeApiResolver {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

impl YouTubeApiResolver {
    /// Build a resolver from search configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no API key is configured.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let api_key = config
            .youtube_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config {
                message: "search.youtube_api_key is required for the youtube_api backend"
                    .to_string(),
                key: Some("search.youtube_api_key".to_string()),
            })?;

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url: config.youtube_api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search(&self, query: &TrackQuery) -> std::result::Result<Option<String>, String> {
        let response = self
            .client
            .get(format!("{}/youtube/v3/search", self.api_url))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(serde_json::from_str::<GoogleErrorBody>(&body)
                .map(|e| format!("{status}: {}", e.error.message))
                .unwrap_or_else(|_| format!("search returned {status}")));
        }

        let results: SearchListResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(results.items.into_iter().find_map(|item| item.id.video_id))
    }
}

#[async_trait]
impl ResourceResolver for YouTubeApiResolver {
    async fn resolve(
        &self,
        query: &TrackQuery,
        diagnostics: &Diagnostics,
    ) -> crate::Result<ResourceLocator> {
        diagnostics.line(format!("Searching YouTube for \"{query}\""));

        match self.search(query).await {
            Ok(Some(id)) => Ok(ResourceLocator::youtube(&id)),
            Ok(None) => Err(ResolveError::NoMatch {
                query: query.to_string(),
            }
            .into()),
            Err(reason) => Err(ResolveError::Lookup {
                query: query.to_string(),
                reason,
            }
            .into()),
        }
    }

    fn name(&self) -> &'static str {
        "youtube-data-api"
    }
}
