//! Route handler functions for all API endpoints.
//!
//! Each handler extracts a JSON body or multipart form via axum extractors,
//! hands the text work to the summarizer or concept-map generator on the
//! blocking pool, and returns JSON responses.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notewise_core::error::NotewiseError;
use notewise_core::{file_extension, sanitize_filename, FileKind};
use notewise_insight::{InsightError, MindmapOutput, MAX_CONCEPTS_LIMIT};
use notewise_whisper::decode_audio;

use crate::error::ApiError;
use crate::state::AppState;

pub const NO_TEXT_PROVIDED: &str = "No text provided";
pub const NO_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const FILE_TYPE_NOT_ALLOWED: &str = "File type not allowed";
pub const COULD_NOT_EXTRACT: &str = "Could not extract text from the file";
pub const NO_FILE_PROVIDED: &str = "No file provided";
pub const NO_AUDIO_FILE_PROVIDED: &str = "No audio file provided";

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
    pub length: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MindmapRequest {
    pub text: Option<String>,
    pub max_concepts: Option<usize>,
    /// "text" (default) or "json".
    pub format: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct MindmapResponse {
    pub mindmap: MindmapOutput,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentSummaryResponse {
    pub original_text: String,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    #[serde(rename = "originalFilename")]
    pub original_filename: String,
    pub path: String,
}

// =============================================================================
// Multipart forms
// =============================================================================

/// The `file` part of a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// A parsed multipart form: the first `file` part plus all text fields.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if form.file.is_none() {
                    form.file = Some(UploadedFile { filename, data });
                }
            } else if !name.is_empty() {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// Take the file part, rejecting a missing part or an empty filename.
    fn take_file(&mut self, missing: &str) -> Result<UploadedFile, ApiError> {
        let file = self
            .file
            .take()
            .ok_or_else(|| ApiError::BadRequest(missing.to_string()))?;
        if file.filename.trim().is_empty() {
            return Err(ApiError::BadRequest(NO_SELECTED_FILE.to_string()));
        }
        Ok(file)
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Sanitize an upload name and classify it, rejecting unknown extensions.
fn classify_upload(filename: &str) -> Result<(String, FileKind), ApiError> {
    let safe = sanitize_filename(filename);
    match FileKind::from_filename(&safe) {
        Some(kind) => Ok((safe, kind)),
        None => Err(ApiError::BadRequest(FILE_TYPE_NOT_ALLOWED.to_string())),
    }
}

// =============================================================================
// Pipeline helpers
// =============================================================================

/// Run the summarizer on the blocking pool with request or configured options.
async fn summarize_on_pool(
    state: &AppState,
    text: String,
    length: Option<String>,
    format: Option<String>,
) -> Result<String, ApiError> {
    let length = length.unwrap_or_else(|| state.config.summarizer.default_length.clone());
    let format = format.unwrap_or_else(|| state.config.summarizer.default_format.clone());
    let summarizer = Arc::clone(&state.summarizer);

    let summary = tokio::task::spawn_blocking(move || {
        summarizer.summarize_str(&text, &length, &format)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Summarizer task failed: {}", e)))??;

    Ok(summary)
}

/// Text of an upload, routed by kind. Audio goes through transcription,
/// everything else through the document extractor.
async fn upload_text(
    state: &AppState,
    filename: &str,
    kind: FileKind,
    data: &[u8],
) -> Result<String, NotewiseError> {
    match kind {
        FileKind::Audio => transcribe_upload(state, filename, data).await,
        _ => state.extractor.extract(filename, data).await,
    }
}

async fn transcribe_upload(
    state: &AppState,
    filename: &str,
    data: &[u8],
) -> Result<String, NotewiseError> {
    let audio = decode_audio(filename, data)?;
    let result = state
        .transcriber
        .transcribe(&audio.samples, audio.sample_rate)
        .await?;
    Ok(result.text)
}

/// Collaborator failures become empty text so the caller's empty-text rule
/// applies.
fn text_or_empty(result: Result<String, NotewiseError>, source: &str) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, source = %source, "Text extraction failed");
            String::new()
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - service banner.
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        status: "online".to_string(),
        message: "Notewise summarizer API is running".to_string(),
    })
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /api/summarizer/summarize-text - summarize a JSON text body.
pub async fn summarize_text(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(body) = body?;
    let text = body
        .text
        .ok_or_else(|| ApiError::BadRequest(NO_TEXT_PROVIDED.to_string()))?;

    let summary = summarize_on_pool(&state, text, body.length, body.format).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /api/summarizer/mindmap - build a concept map from a JSON text body.
pub async fn mindmap(
    State(state): State<AppState>,
    body: Result<Json<MindmapRequest>, JsonRejection>,
) -> Result<Json<MindmapResponse>, ApiError> {
    let Json(body) = body?;
    let text = body
        .text
        .ok_or_else(|| ApiError::BadRequest(NO_TEXT_PROVIDED.to_string()))?;
    let generator = Arc::clone(&state.concept_maps);
    let max_concepts = body
        .max_concepts
        .map_or(generator.max_concepts(), |n| n.min(MAX_CONCEPTS_LIMIT));
    let format = body.format.unwrap_or_else(|| "text".to_string());

    let mindmap = tokio::task::spawn_blocking(move || -> Result<MindmapOutput, InsightError> {
        generator.generate_str(&text, max_concepts, &format)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Concept map task failed: {}", e)))??;

    Ok(Json(MindmapResponse { mindmap }))
}

/// POST /api/summarizer/upload-document - extract text from an upload and
/// summarize it.
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DocumentSummaryResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file(NO_FILE_PART)?;
    let (filename, kind) = classify_upload(&file.filename)?;

    tracing::info!(
        filename = %filename,
        kind = kind.as_str(),
        bytes = file.data.len(),
        "Processing document upload"
    );

    let text = text_or_empty(
        upload_text(&state, &filename, kind, &file.data).await,
        kind.as_str(),
    );
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest(COULD_NOT_EXTRACT.to_string()));
    }

    let summary =
        summarize_on_pool(&state, text.clone(), form.field("length"), form.field("format")).await?;

    Ok(Json(DocumentSummaryResponse {
        original_text: text,
        summary,
    }))
}

/// POST /api/ocr/image - OCR an uploaded image.
pub async fn ocr_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file(NO_FILE_PROVIDED)?;

    let text = text_or_empty(state.extractor.ocr().extract_text(&file.data).await, "image");
    Ok(Json(TextResponse { text }))
}

/// POST /api/ocr/pdf - text of an uploaded PDF, with OCR for scanned pages.
pub async fn ocr_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file(NO_FILE_PROVIDED)?;

    let text = text_or_empty(state.extractor.extract_pdf(&file.data).await, "pdf");
    Ok(Json(TextResponse { text }))
}

/// POST /api/stt/audio - transcribe an uploaded recording.
///
/// Unlike the other endpoints, transcription failures are reported as 500.
pub async fn stt_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file(NO_AUDIO_FILE_PROVIDED)?;
    let filename = sanitize_filename(&file.filename);

    let text = transcribe_upload(&state, &filename, &file.data)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(TextResponse { text }))
}

/// POST /api/upload/ - store an upload under a random name.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file(NO_FILE_PART)?;
    let (original_filename, _) = classify_upload(&file.filename)?;
    let ext = file_extension(&original_filename)
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ApiError::BadRequest(FILE_TYPE_NOT_ALLOWED.to_string()))?;

    let filename = format!("{}.{}", Uuid::new_v4().simple(), ext);
    let path = state.upload_dir.join(&filename);

    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create upload directory: {}", e)))?;
    tokio::fs::write(&path, &file.data)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;

    tracing::info!(
        original = %original_filename,
        stored = %path.display(),
        bytes = file.data.len(),
        "Stored upload"
    );

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        filename,
        original_filename,
        path: path.display().to_string(),
    }))
}

/// GET /api/upload/types - accepted extensions by kind.
pub async fn upload_types() -> Json<BTreeMap<&'static str, Vec<&'static str>>> {
    Json(FileKind::table())
}
