//! Field-level comparison of PDF document pairs (invoices or contracts),
//! delegating document understanding to the Gemini API.
//!
//! The pipeline: upload both documents to the file service
//! ([`GeminiClient::ingest`]), build one or two prompts ([`prompt`]), issue
//! a generation call per scheduled variant ([`Comparator`]), and coerce
//! each raw response into the stable result schema ([`normalize`]).

pub mod client;
pub mod compare;
pub mod error;
pub mod normalize;
pub mod prompt;
pub mod types;

// Re-export commonly used types
pub use client::{DocumentModel, GeminiClient, GeminiConfig, PDF_MIME_TYPE};
pub use compare::{CompareRequest, Comparator};
pub use error::{CompareError, Result};
pub use normalize::{failure, normalize};
pub use prompt::{default_prompt, wrap_custom_prompt};
pub use types::{
    CompareOutcome, ComparisonResult, DifferenceRecord, Differences, DocumentCategory,
    DocumentReference, InvoiceDifferences, PromptVariant,
};
