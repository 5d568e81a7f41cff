//! OpenAPI documentation and schema generation
//!
//! Describes the JSON surface of playlist-dl using utoipa for compile-time spec generation.
//! The HTML form routes are not part of the document.

use utoipa::OpenApi;

/// OpenAPI documentation for the playlist-dl JSON API
///
/// Served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "playlist-dl API",
        version = "0.1.0",
        description = "Turn a Spotify playlist, album or track into local audio files via YouTube search and yt-dlp",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        crate::api::routes::process,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(
            crate::api::routes::ProcessRequest,
            crate::api::routes::ProcessResponse,
            crate::types::PipelineReport,
            crate::types::ItemOutcome,
            crate::types::StageFailure,
            crate::types::Stage,
            crate::types::TrackQuery,
            crate::types::ResourceLocator,
            crate::types::FetchedFile,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "process", description = "Run the extract, resolve and fetch pipeline"),
        (name = "system", description = "Health and API documentation")
    )
)]
pub struct ApiDoc;
