//! Mock Spotify Web API built on wiremock

use playlist_dl::Config;
use serde_json::{Value, json};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A track as the catalog returns it
pub fn track(name: &str, artists: &[&str]) -> Value {
    json!({
        "name": name,
        "artists": artists.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>(),
    })
}

/// Start a mock catalog that issues tokens and serves one playlist and one album
///
/// `playlist` is served at `/v1/playlists/PL1/tracks`, `album` at `/v1/albums/AL1/tracks`,
/// each as a single page.
pub async fn mock_catalog(playlist: &[Value], album: &[Value]) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let playlist_items: Vec<Value> = playlist.iter().map(|t| json!({ "track": t })).collect();
    Mock::given(method("GET"))
        .and(path("/v1/playlists/PL1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": playlist_items,
            "next": null
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/albums/AL1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": album,
            "next": null
        })))
        .mount(&server)
        .await;

    server
}

/// Configuration pointing every external collaborator at test doubles
pub fn test_config(catalog: &MockServer, ytdlp: &Path, download_dir: &Path) -> Config {
    let mut config = Config::default();
    config.spotify.client_id = Some("client".to_string());
    config.spotify.client_secret = Some("secret".to_string());
    config.spotify.api_url = catalog.uri();
    config.spotify.accounts_url = catalog.uri();
    config.tools.ytdlp_path = Some(ytdlp.to_path_buf());
    config.tools.search_path = false;
    config.download.download_dir = download_dir.to_path_buf();
    config
}
