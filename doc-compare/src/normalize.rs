//! Coercion of raw model output into the stable result schema.
//!
//! A variant's failure is always represented as data. Malformed output
//! becomes the error sentinel `{ "differences": [], "error": "<label>
//! prompt error: <message>" }`; nothing here panics or returns `Err`.

use crate::types::{ComparisonResult, Differences, PromptVariant};

/// Parse raw model output for one prompt variant.
///
/// Strict JSON parse into the result schema. Valid JSON whose
/// "differences" entry matches neither known shape still parses (the value
/// passes through as [`Differences::Other`] for the consumer to flag);
/// anything else yields the variant's sentinel.
pub fn normalize(variant: PromptVariant, raw: &str) -> ComparisonResult {
    match serde_json::from_str::<ComparisonResult>(raw) {
        Ok(result) => result,
        Err(err) => failure(variant, &err.to_string()),
    }
}

/// Build the error sentinel for a variant whose call or parse failed.
pub fn failure(variant: PromptVariant, message: &str) -> ComparisonResult {
    ComparisonResult {
        differences: Differences::empty_flat(),
        error: Some(format!("{} prompt error: {}", variant.label(), message)),
    }
}
