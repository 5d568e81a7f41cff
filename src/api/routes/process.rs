//! JSON processing endpoint

use super::{ProcessRequest, ProcessResponse, report_status};
use crate::api::state::AppState;
use crate::diagnostics::Diagnostics;
use crate::error::Error;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

/// POST /api/v1/process - Run the pipeline for one reference
///
/// The response status follows the run: 200 when every track was saved, otherwise the status
/// of the first failure. The report is returned in either case.
#[utoipa::path(
    post,
    path = "/api/v1/process",
    tag = "process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Every track was saved", body = ProcessResponse),
        (status = 400, description = "Empty or invalid reference", body = crate::error::ApiError),
        (status = 404, description = "Catalog item or search match not found", body = ProcessResponse),
        (status = 502, description = "Catalog, search or download failure", body = ProcessResponse),
        (status = 503, description = "yt-dlp could not be started", body = ProcessResponse)
    )
)]
pub async fn process(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Response, Error> {
    let input = request.input.trim();
    if input.is_empty() {
        return Err(Error::InvalidInput("input must not be empty".to_string()));
    }

    let diagnostics = Diagnostics::new();
    let report = state.pipeline.run(input, &diagnostics).await;
    let status = report_status(&report);

    Ok((
        status,
        Json(ProcessResponse {
            report,
            diagnostics: diagnostics.lines(),
        }),
    )
        .into_response())
}
