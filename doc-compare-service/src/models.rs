use serde::Serialize;

use doc_compare::{
    CompareOutcome, CompareRequest, ComparisonResult, DocumentCategory, PromptVariant,
    default_prompt,
};

use crate::storage::ComparisonRecord;

/// Response body for a completed comparison submission.
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub session_id: String,
    pub file1: String,
    pub file2: String,
    pub category: DocumentCategory,
    /// The prompt text actually sent per variant, echoed for inspection.
    pub prompts: PromptEcho,
    /// Human-readable presentation signals per variant (failures, empty
    /// results, unrecognized shapes).
    pub notices: Vec<String>,
    pub result: CompareOutcome,
}

#[derive(Debug, Serialize)]
pub struct PromptEcho {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl PromptEcho {
    /// Echo which prompts a request scheduled: the raw custom text and/or
    /// the category default template.
    pub fn for_request(request: &CompareRequest) -> Self {
        let custom = request.custom_text().map(str::to_string);
        let default = if custom.is_none() || request.include_default {
            Some(default_prompt(request.category).to_string())
        } else {
            None
        };
        Self { custom, default }
    }
}

pub fn build_response(record: ComparisonRecord, request: &CompareRequest) -> ComparisonResponse {
    let notices = outcome_notices(&record.outcome, record.category);
    ComparisonResponse {
        session_id: record.id,
        file1: record.file1,
        file2: record.file2,
        category: record.category,
        prompts: PromptEcho::for_request(request),
        notices,
        result: record.outcome,
    }
}

/// Presentation signals the result tables are built from: one notice per
/// noteworthy variant state. A populated, recognized result produces none.
pub fn outcome_notices(outcome: &CompareOutcome, category: DocumentCategory) -> Vec<String> {
    match outcome {
        CompareOutcome::Both {
            custom,
            default_result,
        } => {
            let mut notices = variant_notices(Some(PromptVariant::Custom), custom, category);
            notices.extend(variant_notices(
                Some(PromptVariant::Default),
                default_result,
                category,
            ));
            notices
        }
        CompareOutcome::Single(result) => variant_notices(None, result, category),
    }
}

fn variant_notices(
    variant: Option<PromptVariant>,
    result: &ComparisonResult,
    category: DocumentCategory,
) -> Vec<String> {
    let prefix = match variant {
        Some(variant) => format!("{} prompt: ", variant.label()),
        None => String::new(),
    };

    let mut notices = Vec::new();
    if let Some(error) = &result.error {
        // the sentinel text already names the variant
        notices.push(error.clone());
    } else if result.differences.is_unrecognized() {
        notices.push(format!("{prefix}Unexpected result format."));
    } else if result.is_empty() {
        notices.push(format!(
            "{prefix}No differences detected between the two {}.",
            category.as_str().to_lowercase()
        ));
    }
    notices
}
