//! Gemini API client: file ingestion and multimodal generation.
//!
//! Two external calls are involved in a comparison. The Files API receives
//! raw document bytes and returns a reference URI; generateContent receives
//! both references plus a prompt and returns a JSON text payload. Both are
//! plain REST requests over reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::error::{CompareError, Result};
use crate::types::DocumentReference;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const UPLOAD_URL: &str = "https://generativelanguage.googleapis.com/upload/v1beta/files";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Output ceiling for a single generation. Must be large enough to hold a
/// full line-item diff of a multi-page invoice; tunable, not architectural.
pub const MAX_OUTPUT_TOKENS: u32 = 16_384;

/// Client configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Client-side request timeout. `None` leaves hung calls to block until
    /// the transport gives up.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Read `GEMINI_API_KEY` (required), `GEMINI_MODEL` and
    /// `GEMINI_TIMEOUT_SECS` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| CompareError::Config("GEMINI_API_KEY not set".to_string()))?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = match std::env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    CompareError::Config(format!("invalid GEMINI_TIMEOUT_SECS: {raw}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };
        Ok(Self {
            api_key,
            model,
            timeout,
        })
    }
}

/// Seam between the orchestrator and the remote model service.
#[async_trait]
pub trait DocumentModel: Send + Sync {
    /// Hand raw bytes to the file service and get back a reference usable
    /// in generation requests. Any failure is fatal to the comparison.
    async fn ingest(&self, content: Vec<u8>, display_name: &str) -> Result<DocumentReference>;

    /// Issue one generation request carrying both document references and
    /// the prompt, and return the raw text payload.
    async fn generate(
        &self,
        file1: &DocumentReference,
        file2: &DocumentReference,
        prompt: &str,
    ) -> Result<String>;
}

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| CompareError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl DocumentModel for GeminiClient {
    async fn ingest(&self, content: Vec<u8>, display_name: &str) -> Result<DocumentReference> {
        info!(
            "Uploading '{}' ({} bytes) to the file service",
            display_name,
            content.len()
        );

        let boundary = format!("upload-{}", Uuid::new_v4().simple());
        let body = build_upload_body(&boundary, display_name, &content);

        let response = self
            .http
            .post(UPLOAD_URL)
            .header("x-goog-api-key", &self.config.api_key)
            .header("X-Goog-Upload-Protocol", "multipart")
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| CompareError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CompareError::Upload(format!(
                "file service returned {}",
                response.status()
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| CompareError::Upload(e.to_string()))?;

        let file = &response_json["file"];
        let uri = file["uri"]
            .as_str()
            .ok_or_else(|| CompareError::Upload("upload response missing file uri".to_string()))?;
        let name = file["name"].as_str().unwrap_or_default();

        info!("Uploaded '{}' as {}", display_name, uri);

        Ok(DocumentReference {
            name: name.to_string(),
            display_name: display_name.to_string(),
            uri: uri.to_string(),
            mime_type: PDF_MIME_TYPE.to_string(),
        })
    }

    async fn generate(
        &self,
        file1: &DocumentReference,
        file2: &DocumentReference,
        prompt: &str,
    ) -> Result<String> {
        let url = format!(
            "{API_BASE_URL}/models/{}:generateContent",
            self.config.model
        );
        let payload = build_generate_request(file1, file2, prompt);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CompareError::LlmCall(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CompareError::LlmCall(format!(
                "model service returned {}",
                response.status()
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| CompareError::LlmCall(e.to_string()))?;

        candidate_text(&response_json)
    }
}

/// multipart/related body for the Files API simple upload: a JSON metadata
/// part followed by the raw document bytes.
fn build_upload_body(boundary: &str, display_name: &str, content: &[u8]) -> Vec<u8> {
    let metadata = json!({ "file": { "displayName": display_name } });

    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {PDF_MIME_TYPE}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// generateContent payload: both file references first, then the prompt,
/// with a deterministic-leaning JSON-typed generation config.
fn build_generate_request(
    file1: &DocumentReference,
    file2: &DocumentReference,
    prompt: &str,
) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "fileData": { "mimeType": file1.mime_type, "fileUri": file1.uri } },
                { "fileData": { "mimeType": file2.mime_type, "fileUri": file2.uri } },
                { "text": prompt }
            ]
        }],
        "generationConfig": {
            "temperature": 0.2,
            "topP": 1,
            "topK": 1,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "responseMimeType": "application/json"
        }
    })
}

/// Concatenated text of the first candidate's parts.
fn candidate_text(response: &Value) -> Result<String> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| CompareError::LlmCall("invalid response format from model".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(CompareError::LlmCall(
            "model response contained no text".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CompareRequest, Comparator};
    use crate::types::DocumentCategory;
    use std::sync::Arc;

    fn doc(display_name: &str, uri: &str) -> DocumentReference {
        DocumentReference {
            name: format!("files/{display_name}"),
            display_name: display_name.to_string(),
            uri: uri.to_string(),
            mime_type: PDF_MIME_TYPE.to_string(),
        }
    }

    #[test]
    fn generate_request_carries_both_files_then_prompt() {
        let payload = build_generate_request(
            &doc("a.pdf", "https://files.example/a"),
            &doc("b.pdf", "https://files.example/b"),
            "compare these",
        );

        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["fileData"]["fileUri"], "https://files.example/a");
        assert_eq!(parts[1]["fileData"]["fileUri"], "https://files.example/b");
        assert_eq!(parts[2]["text"], "compare these");
    }

    #[test]
    fn generate_request_pins_deterministic_json_config() {
        let payload = build_generate_request(
            &doc("a.pdf", "uri-a"),
            &doc("b.pdf", "uri-b"),
            "compare these",
        );

        let config = &payload["generationConfig"];
        assert_eq!(config["temperature"], 0.2);
        assert_eq!(config["topP"], 1);
        assert_eq!(config["topK"], 1);
        assert_eq!(config["maxOutputTokens"], MAX_OUTPUT_TOKENS);
        assert_eq!(config["responseMimeType"], "application/json");
    }

    #[test]
    fn upload_body_frames_metadata_and_content() {
        let body = build_upload_body("bnd", "invoice.pdf", b"%PDF-1.4 payload");
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with("--bnd\r\n"));
        assert!(text.contains(r#""displayName":"invoice.pdf""#));
        assert!(text.contains("Content-Type: application/pdf\r\n\r\n%PDF-1.4 payload"));
        assert!(text.ends_with("--bnd--\r\n"));
    }

    #[test]
    fn candidate_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "{\"differences\":" },
                        { "text": " []}" }
                    ]
                }
            }]
        });
        assert_eq!(candidate_text(&response).unwrap(), r#"{"differences": []}"#);
    }

    #[test]
    fn candidate_text_rejects_empty_responses() {
        assert!(candidate_text(&json!({})).is_err());
        assert!(candidate_text(&json!({ "candidates": [] })).is_err());
        assert!(
            candidate_text(&json!({
                "candidates": [{ "content": { "parts": [] } }]
            }))
            .is_err()
        );
    }

    /// Live end-to-end run against the real API.
    /// Usage: GEMINI_API_KEY=key DOC_COMPARE_PDF1=a.pdf DOC_COMPARE_PDF2=b.pdf \
    ///        cargo test live_contract_comparison -- --nocapture
    #[tokio::test]
    async fn live_contract_comparison() -> anyhow::Result<()> {
        let (Ok(pdf1), Ok(pdf2)) = (
            std::env::var("DOC_COMPARE_PDF1"),
            std::env::var("DOC_COMPARE_PDF2"),
        ) else {
            println!("Skipping test - set DOC_COMPARE_PDF1 and DOC_COMPARE_PDF2");
            return Ok(());
        };
        if std::env::var("GEMINI_API_KEY").is_err() {
            println!("Skipping test - set GEMINI_API_KEY environment variable");
            return Ok(());
        }

        let client = Arc::new(GeminiClient::new(GeminiConfig::from_env()?)?);

        let doc1 = client
            .ingest(tokio::fs::read(&pdf1).await?, "file1.pdf")
            .await?;
        let doc2 = client
            .ingest(tokio::fs::read(&pdf2).await?, "file2.pdf")
            .await?;

        let comparator = Comparator::new(client);
        let outcome = comparator
            .compare(
                &doc1,
                &doc2,
                &CompareRequest {
                    category: DocumentCategory::Contracts,
                    custom_prompt: None,
                    include_default: false,
                },
            )
            .await;

        println!("{}", outcome.to_pretty_json()?);
        Ok(())
    }
}
