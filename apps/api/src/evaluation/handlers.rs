use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::document::{extract_text_blocking, looks_like_pdf};
use crate::errors::AppError;
use crate::evaluation::analyzer::analyze;
use crate::evaluation::models::AnalysisOutcome;
use crate::evaluation::render::render_text;
use crate::state::AppState;
use crate::store::Lookup;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEvaluationRequest {
    pub cv_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCreated {
    pub result_id: Uuid,
    pub result_url: String,
}

/// Envelope for a stored or freshly synthesized outcome.
#[derive(Debug, Serialize)]
pub struct RawOutcome {
    pub raw: AnalysisOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluations
/// Multipart upload with a `pdf` field.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationCreated>, AppError> {
    let mut upload: Option<(Option<String>, Bytes)> = None;
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some("pdf") {
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            upload = Some((file_name, data));
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("No file uploaded in field 'pdf'".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if !looks_like_pdf(file_name.as_deref(), &data) {
        return Err(AppError::Validation("Only PDF files are accepted".to_string()));
    }

    info!(
        "Received CV upload {} ({} bytes)",
        file_name.as_deref().unwrap_or("<unnamed>"),
        data.len()
    );
    let cv_text = extract_text_blocking(data).await?;
    evaluate_and_store(&state, &cv_text).await
}

/// POST /api/v1/evaluations/text
pub async fn handle_text(
    State(state): State<AppState>,
    Json(req): Json<TextEvaluationRequest>,
) -> Result<Json<EvaluationCreated>, AppError> {
    if req.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cvText must not be empty".to_string()));
    }
    evaluate_and_store(&state, &req.cv_text).await
}

/// POST /api/v1/synthesize
/// Runs report synthesis directly on raw `narrative` and `source` bytes.
pub async fn handle_synthesize(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RawOutcome>, AppError> {
    let mut narrative: Option<Bytes> = None;
    let mut source = Bytes::new();
    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("narrative") => narrative = Some(field.bytes().await.map_err(multipart_error)?),
            Some("source") => source = field.bytes().await.map_err(multipart_error)?,
            _ => {}
        }
    }
    let narrative =
        narrative.ok_or_else(|| AppError::Validation("Missing field 'narrative'".to_string()))?;

    let raw = match state.synthesizer.synthesize_bytes(&narrative, &source) {
        Ok(report) => AnalysisOutcome::Report(report),
        Err(failure) => AnalysisOutcome::Failure(failure),
    };
    Ok(Json(RawOutcome { raw }))
}

/// GET /api/v1/results/:id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RawOutcome>, AppError> {
    let raw = load_outcome(&state, &id).await?;
    Ok(Json(RawOutcome { raw }))
}

/// GET /api/v1/results/:id/text
pub async fn handle_get_result_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, AppError> {
    let outcome = load_outcome(&state, &id).await?;
    Ok(render_text(&outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn evaluate_and_store(
    state: &AppState,
    cv_text: &str,
) -> Result<Json<EvaluationCreated>, AppError> {
    let outcome = analyze(state.generator.as_ref(), &state.synthesizer, cv_text).await?;
    let result_id = Uuid::new_v4();
    state.store.put(result_id, outcome).await?;
    info!("Stored evaluation result {result_id}");

    Ok(Json(EvaluationCreated {
        result_id,
        result_url: state.config.result_url(result_id),
    }))
}

async fn load_outcome(state: &AppState, id: &str) -> Result<AnalysisOutcome, AppError> {
    // An id that is not a UUID can never have been issued.
    let not_found = || AppError::NotFound("Result not found".to_string());
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    match state.store.get(id).await? {
        Lookup::Found(outcome) => Ok(outcome),
        Lookup::Expired => Err(AppError::Expired("Result has expired".to_string())),
        Lookup::NotFound => Err(not_found()),
    }
}

async fn next_field(
    multipart: &mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'_>>, AppError> {
    multipart.next_field().await.map_err(multipart_error)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}
