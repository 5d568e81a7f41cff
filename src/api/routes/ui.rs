//! HTML form and result page
//!
//! Pages are embedded at compile time and filled with `{{name}}` placeholders.

use super::{ProcessForm, report_status};
use crate::api::state::AppState;
use crate::diagnostics::{Diagnostics, escape_html};
use crate::types::{PipelineReport, Stage};
use axum::{
    Form,
    extract::State,
    http::{Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const RESULT_HTML: &str = include_str!("../ui/result.html");

/// GET /
///
/// Serves the input form
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /process_input
///
/// Runs the pipeline for the submitted reference and renders the diagnostic text. A failing
/// run still renders everything collected up to the failure, under a banner, with the
/// failure's status code.
pub async fn process_input(
    State(state): State<AppState>,
    Form(form): Form<ProcessForm>,
) -> Response {
    let input = form.user_input.trim();
    if input.is_empty() {
        let banner = banner_html("Please enter a Spotify playlist, album or track link.");
        return (StatusCode::BAD_REQUEST, Html(render_result("", &banner, ""))).into_response();
    }

    let diagnostics = Diagnostics::new();
    let report = state.pipeline.run(input, &diagnostics).await;
    let status = report_status(&report);

    let banner = failure_message(&report)
        .map(|message| banner_html(&message))
        .unwrap_or_default();
    let page = render_result(&escape_html(input), &banner, &diagnostics.to_html());

    (status, Html(page)).into_response()
}

/// Any other method on /process_input
pub async fn unsupported_method(method: Method) -> Response {
    tracing::debug!(method = %method, "rejected /process_input request");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        format!("Unsupported method: {method}"),
    )
        .into_response()
}

fn failure_message(report: &PipelineReport) -> Option<String> {
    let failure = report.failure()?;
    if failure.stage == Stage::Extract {
        return Some(format!("Could not read tracks: {}", failure.reason));
    }
    Some(format!(
        "{} of {} track(s) saved. Failed to {}: {}",
        report.fetched_count(),
        report.queries.len(),
        failure.stage,
        failure.reason
    ))
}

fn banner_html(message: &str) -> String {
    format!(
        r#"<div class="banner" role="alert">{}</div>"#,
        escape_html(message)
    )
}

fn render_result(input: &str, banner: &str, result: &str) -> String {
    fill_template(
        RESULT_HTML,
        &[("input", input), ("banner", banner), ("result", result)],
    )
}

/// Substitute `{{key}}` placeholders in one pass
///
/// Substituted values are never rescanned, so text that happens to contain `{{...}}` is
/// inserted verbatim. Unknown placeholders are left as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
