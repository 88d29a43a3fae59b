//! Axum route handlers for the Resume API.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::generator::{FreeformFormat, StructuredFormat};
use crate::models::resume::ResumeInput;
use crate::render::Artifact;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StructuredQuery {
    #[serde(default)]
    pub format: StructuredFormat,
}

#[derive(Debug, Default, Deserialize)]
pub struct FreeformQuery {
    #[serde(default)]
    pub format: FreeformFormat,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes?format=pdf|json
///
/// Structured generation. Returns `resume.pdf` as an attachment, or the
/// normalized record as JSON.
pub async fn handle_generate(
    State(state): State<AppState>,
    Query(query): Query<StructuredQuery>,
    Json(input): Json<ResumeInput>,
) -> Result<Response, AppError> {
    let artifact = state
        .generator
        .generate_structured(input, query.format)
        .await?;
    Ok(attachment(artifact))
}

/// POST /api/v1/resumes/freeform?format=txt|pdf
pub async fn handle_generate_freeform(
    State(state): State<AppState>,
    Query(query): Query<FreeformQuery>,
    Json(input): Json<ResumeInput>,
) -> Result<Response, AppError> {
    let artifact = state
        .generator
        .generate_freeform(input, query.format)
        .await?;
    Ok(attachment(artifact))
}

fn attachment(artifact: Artifact) -> Response {
    let disposition = artifact.content_disposition();
    (
        [
            (header::CONTENT_TYPE, artifact.mime.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}
