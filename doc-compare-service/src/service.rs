use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use doc_compare::{
    CompareRequest, Comparator, DocumentCategory, DocumentModel, GeminiClient, GeminiConfig,
};

use crate::models::{ComparisonResponse, build_response};
use crate::storage::{ComparisonRecord, ComparisonStore, InMemoryComparisonStore};

/// Per-file ceiling advertised to users. Oversized files are rejected
/// before any upstream call.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Whole-request ceiling: two files plus form fields.
const MAX_BODY_BYTES: usize = 2 * MAX_FILE_BYTES + 64 * 1024;

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn upstream_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ComparisonStore>,
    pub model: Arc<dyn DocumentModel>,
    pub comparator: Comparator,
}

impl AppState {
    pub fn new(store: Arc<dyn ComparisonStore>, model: Arc<dyn DocumentModel>) -> Self {
        Self {
            store,
            comparator: Comparator::new(model.clone()),
            model,
        }
    }
}

/// Build the application against the real Gemini backend, configured from
/// the environment.
pub fn create_app() -> anyhow::Result<Router> {
    let config = GeminiConfig::from_env()?;
    let model: Arc<dyn DocumentModel> = Arc::new(GeminiClient::new(config)?);
    let store: Arc<dyn ComparisonStore> = Arc::new(InMemoryComparisonStore::new());
    Ok(build_router(AppState::new(store, model)))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/comparisons", post(create_comparison))
        .route(
            "/comparisons/{id}",
            get(get_comparison).delete(reset_comparison),
        )
        .route("/comparisons/{id}/download", get(download_comparison))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Document Comparison Service",
        "version": "1.0.0",
        "description": "Field-level comparison of two PDF documents (invoices or contracts) via a multimodal LLM",
        "endpoints": {
            "POST /comparisons": "Submit two PDFs plus options, receive the comparison result",
            "GET /comparisons/{id}": "Replay a stored comparison",
            "GET /comparisons/{id}/download": "Download the JSON artifact and close the session",
            "DELETE /comparisons/{id}": "Discard a stored comparison",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

struct UploadedFile {
    name: String,
    content: Vec<u8>,
}

struct CompareForm {
    files: Vec<UploadedFile>,
    category: Option<String>,
    custom_prompt: Option<String>,
    include_default: bool,
}

fn parse_bool_field(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" | "" => Some(false),
        _ => None,
    }
}

async fn read_form(multipart: &mut Multipart) -> Result<CompareForm, ApiError> {
    let mut form = CompareForm {
        files: Vec::new(),
        category: None,
        custom_prompt: None,
        include_default: false,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request_error(&format!("Invalid multipart payload: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("document.pdf").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request_error(&format!("Failed to read '{file_name}': {e}")))?
                    .to_vec();
                if content.len() > MAX_FILE_BYTES {
                    return Err(bad_request_error(&format!(
                        "'{file_name}' exceeds the 10MB limit"
                    )));
                }
                form.files.push(UploadedFile {
                    name: file_name,
                    content,
                });
            }
            "category" => {
                form.category = Some(read_text_field(field, "category").await?);
            }
            "custom_prompt" => {
                form.custom_prompt = Some(read_text_field(field, "custom_prompt").await?);
            }
            "include_default" => {
                let raw = read_text_field(field, "include_default").await?;
                form.include_default = parse_bool_field(&raw).ok_or_else(|| {
                    bad_request_error("include_default must be \"true\" or \"false\"")
                })?;
            }
            // unknown parts are ignored
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| bad_request_error(&format!("Failed to read '{name}': {e}")))
}

async fn create_comparison(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<ComparisonResponse> {
    let form = read_form(&mut multipart).await?;

    let category = form
        .category
        .as_deref()
        .and_then(DocumentCategory::parse)
        .ok_or_else(|| bad_request_error("category must be \"Invoices\" or \"Contracts\""))?;

    let mut files = form.files.into_iter();
    let (Some(file1), Some(file2), None) = (files.next(), files.next(), files.next()) else {
        return Err(bad_request_error(
            "Please upload exactly two files for comparison",
        ));
    };

    info!(
        "Comparing '{}' and '{}' as {}",
        file1.name, file2.name, category
    );

    // documents are ingested one after another; an upload failure aborts
    // the whole comparison with no partial result
    let doc1 = state
        .model
        .ingest(file1.content, &file1.name)
        .await
        .map_err(|e| upstream_error("File upload failed", &e.to_string()))?;
    let doc2 = state
        .model
        .ingest(file2.content, &file2.name)
        .await
        .map_err(|e| upstream_error("File upload failed", &e.to_string()))?;

    let request = CompareRequest {
        category,
        custom_prompt: form.custom_prompt,
        include_default: form.include_default,
    };
    let outcome = state.comparator.compare(&doc1, &doc2, &request).await;

    let record = ComparisonRecord {
        id: Uuid::new_v4().to_string(),
        file1: doc1.display_name,
        file2: doc2.display_name,
        category,
        outcome,
        created_at: Utc::now(),
    };

    state
        .store
        .save(record.clone())
        .await
        .map_err(|e| internal_error("Failed to store comparison", &e.to_string()))?;

    info!("Comparison {} completed", record.id);

    Ok(Json(build_response(record, &request)))
}

fn validate_session_id(id: &str) -> Result<(), ApiError> {
    if Uuid::parse_str(id).is_err() {
        return Err(bad_request_error("Invalid session id format"));
    }
    Ok(())
}

async fn load_record(state: &AppState, id: &str) -> Result<ComparisonRecord, ApiError> {
    match state.store.get(id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(not_found_error("Comparison not found", id)),
        Err(e) => {
            error!("Failed to load comparison {}: {}", id, e);
            Err(internal_error("Failed to load comparison", &e.to_string()))
        }
    }
}

async fn get_comparison(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ComparisonRecord> {
    validate_session_id(&id)?;
    let record = load_record(&state, &id).await?;
    Ok(Json(record))
}

/// Serve the pretty-printed artifact as a file download. A completed
/// download closes the session, matching the reset-after-download flow.
async fn download_comparison(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_session_id(&id)?;
    let record = load_record(&state, &id).await?;

    let body = record
        .outcome
        .to_pretty_json()
        .map_err(|e| internal_error("Failed to serialize comparison", &e.to_string()))?;

    if let Err(e) = state.store.delete(&id).await {
        error!("Failed to clear session {} after download: {}", id, e);
    }

    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                record.category.artifact_file_name()
            ),
        ),
    ];
    Ok((headers, body))
}

async fn reset_comparison(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    validate_session_id(&id)?;
    // deleting an unknown session is a no-op
    state
        .store
        .delete(&id)
        .await
        .map_err(|e| internal_error("Failed to reset comparison", &e.to_string()))?;

    info!("Comparison {} reset", id);

    Ok(Json(json!({
        "session_id": id,
        "status": "reset"
    })))
}
