//! Axum route handlers for the analysis endpoints. All of them sit behind `QuotaGuard`.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::access::guard::QuotaGuard;
use crate::analysis::analyzer::{analyze, AnalysisResult};
use crate::analysis::extract::{extract_text, DEFAULT_UPLOAD_NAME};
use crate::analysis::improver::{improve, ImproveResult};
use crate::analysis::matcher::{match_resume, MatchResult};
use crate::analysis::require_min_length;
use crate::errors::AppError;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub resume_text: String,
    #[serde(default)]
    pub target_role: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    QuotaGuard(client): QuotaGuard,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    require_min_length(
        &request.text,
        "Resume text too short (minimum 50 characters)",
    )?;

    let result = analyze(&state.rules, &request.text);
    tracing::debug!(client = %client.id, score = result.overall_score, "Resume analyzed");
    Ok(Json(result))
}

/// POST /analyze/upload
///
/// Multipart upload with the resume in the `file` field. Bytes are decoded as text; binary
/// formats are not parsed.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    QuotaGuard(client): QuotaGuard,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let max_bytes = state.config.max_upload_bytes;
    let too_large = || AppError::Validation(format!("File too large (max {} bytes)", max_bytes));

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large()
        } else {
            AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
        }
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_NAME)
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large()
            } else {
                AppError::Validation(format!("Failed to read upload: {}", e.body_text()))
            }
        })?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload
        .ok_or_else(|| AppError::Validation(format!("Missing '{UPLOAD_FIELD}' field")))?;

    if bytes.len() > max_bytes {
        return Err(too_large());
    }

    let text = extract_text(&bytes, &filename);
    require_min_length(&text, "Could not extract sufficient text from file")?;

    let result = analyze(&state.rules, &text);
    tracing::debug!(
        client = %client.id,
        filename = %filename,
        bytes = bytes.len(),
        score = result.overall_score,
        "Uploaded resume analyzed"
    );
    Ok(Json(result))
}

/// POST /match
pub async fn handle_match(
    State(state): State<AppState>,
    QuotaGuard(client): QuotaGuard,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    require_min_length(&request.resume_text, "Resume text too short")?;
    require_min_length(&request.job_description, "Job description too short")?;

    let result = match_resume(&state.rules, &request.resume_text, &request.job_description);
    tracing::debug!(client = %client.id, fit_score = result.fit_score, "Resume matched");
    Ok(Json(result))
}

/// POST /improve
pub async fn handle_improve(
    State(state): State<AppState>,
    QuotaGuard(client): QuotaGuard,
    Json(request): Json<ImproveRequest>,
) -> Result<Json<ImproveResult>, AppError> {
    require_min_length(&request.resume_text, "Resume text too short")?;

    let result = improve(
        &state.rules,
        &request.resume_text,
        request.target_role.as_deref(),
    );
    tracing::debug!(
        client = %client.id,
        suggestions = result.suggestions.len(),
        "Improvement suggestions built"
    );
    Ok(Json(result))
}
