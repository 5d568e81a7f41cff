//! Route handlers
//!
//! Handlers are organized by surface:
//! - [`ui`] - HTML form and result page
//! - [`process`] - JSON processing endpoint
//! - [`system`] - Health and OpenAPI

use crate::types::PipelineReport;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

mod process;
mod system;
mod ui;

pub use process::*;
pub use system::*;
pub use ui::*;

/// Form body for POST /process_input
#[derive(Debug, Deserialize)]
pub struct ProcessForm {
    /// Catalog reference typed into the form (missing field treated as empty)
    #[serde(default)]
    pub user_input: String,
}

/// Request body for POST /api/v1/process
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProcessRequest {
    /// Spotify playlist, album or track link or URI
    pub input: String,
}

/// Response for POST /api/v1/process
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProcessResponse {
    /// Outcome of the run
    pub report: PipelineReport,
    /// Diagnostic lines produced while processing, in order
    pub diagnostics: Vec<String>,
}

/// Response status for a finished run: 200, or the status of the first failure
fn report_status(report: &PipelineReport) -> StatusCode {
    report
        .failure()
        .map(|failure| {
            StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        })
        .unwrap_or(StatusCode::OK)
}
