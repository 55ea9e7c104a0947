//! Comparison orchestration: decides which prompt variants run, issues the
//! generation calls sequentially, and collapses the per-variant results.

use std::sync::Arc;

use tracing::{info, warn};

use crate::client::DocumentModel;
use crate::normalize::{failure, normalize};
use crate::prompt::{default_prompt, wrap_custom_prompt};
use crate::types::{
    CompareOutcome, ComparisonResult, DocumentCategory, DocumentReference, PromptVariant,
};

/// Parameters of one comparison run.
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub category: DocumentCategory,
    pub custom_prompt: Option<String>,
    /// When a custom prompt is supplied, also run the default prompt.
    /// Ignored when no custom prompt is present (the default always runs).
    pub include_default: bool,
}

impl CompareRequest {
    /// The trimmed custom prompt, or `None` when blank. Blank custom text
    /// schedules the default variant alone.
    pub fn custom_text(&self) -> Option<&str> {
        self.custom_prompt
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Runs prompt variants against a document pair through a [`DocumentModel`].
///
/// Variant scheduling:
///
/// | custom non-blank | include_default | variants run          |
/// |------------------|-----------------|-----------------------|
/// | no               | ignored         | Default only          |
/// | yes              | false           | Custom only           |
/// | yes              | true            | Custom, then Default  |
///
/// A variant's call or parse failure becomes that variant's error sentinel
/// and never aborts the other variant. Calls are strictly sequential.
#[derive(Clone)]
pub struct Comparator {
    model: Arc<dyn DocumentModel>,
}

impl Comparator {
    pub fn new(model: Arc<dyn DocumentModel>) -> Self {
        Self { model }
    }

    pub async fn compare(
        &self,
        file1: &DocumentReference,
        file2: &DocumentReference,
        request: &CompareRequest,
    ) -> CompareOutcome {
        if let Some(text) = request.custom_text() {
            let custom = self
                .run_variant(PromptVariant::Custom, file1, file2, &wrap_custom_prompt(text))
                .await;

            if request.include_default {
                let default_result = self
                    .run_variant(
                        PromptVariant::Default,
                        file1,
                        file2,
                        default_prompt(request.category),
                    )
                    .await;
                CompareOutcome::Both {
                    custom,
                    default_result,
                }
            } else {
                CompareOutcome::Single(custom)
            }
        } else {
            let result = self
                .run_variant(
                    PromptVariant::Default,
                    file1,
                    file2,
                    default_prompt(request.category),
                )
                .await;
            CompareOutcome::Single(result)
        }
    }

    async fn run_variant(
        &self,
        variant: PromptVariant,
        file1: &DocumentReference,
        file2: &DocumentReference,
        prompt: &str,
    ) -> ComparisonResult {
        info!(
            "Running {} prompt over '{}' and '{}'",
            variant.label(),
            file1.display_name,
            file2.display_name
        );

        match self.model.generate(file1, file2, prompt).await {
            Ok(raw) => normalize(variant, &raw),
            Err(err) => {
                warn!("{} prompt failed: {}", variant.label(), err);
                failure(variant, &err.to_string())
            }
        }
    }
}
