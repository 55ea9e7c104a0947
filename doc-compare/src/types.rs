use serde::{Deserialize, Serialize};

/// Document family a comparison runs over. Chosen once per comparison and
/// never inferred from document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCategory {
    Invoices,
    Contracts,
}

impl DocumentCategory {
    /// Case-sensitive parse of the wire name ("Invoices" / "Contracts").
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Invoices" => Some(Self::Invoices),
            "Contracts" => Some(Self::Contracts),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoices => "Invoices",
            Self::Contracts => "Contracts",
        }
    }

    /// File name offered for the downloadable JSON artifact.
    pub fn artifact_file_name(&self) -> String {
        format!("{}_differences.json", self.as_str().to_lowercase())
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which prompt produced a result entry within a single comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptVariant {
    Custom,
    Default,
}

impl PromptVariant {
    /// Label used in error sentinels ("Custom prompt error: ...").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Custom => "Custom",
            Self::Default => "Default",
        }
    }
}

/// Opaque handle to a document uploaded to the file service. Created once
/// per upload and consumed read-only by generation requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReference {
    /// Service resource name (e.g. "files/abc123").
    pub name: String,
    pub display_name: String,
    /// URI to embed in generation requests.
    pub uri: String,
    pub mime_type: String,
}

/// One field-level mismatch between the two documents.
///
/// The three value fields are always present in serialized form; absent keys
/// in model output are coerced to empty strings so consumers can read all of
/// them uniformly. `item_index` only appears on invoice line-item records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifferenceRecord {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub file1_value: String,
    #[serde(default)]
    pub file2_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index: Option<String>,
}

/// The structured invoice schema: header-level and line-item-level
/// mismatches reported separately. Both arrays are always explicit, even
/// when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDifferences {
    pub header_differences: Vec<DifferenceRecord>,
    pub line_item_differences: Vec<DifferenceRecord>,
}

impl InvoiceDifferences {
    pub fn is_empty(&self) -> bool {
        self.header_differences.is_empty() && self.line_item_differences.is_empty()
    }
}

/// The two known shapes of the "differences" entry, plus a pass-through for
/// valid JSON that matches neither. `Other` carries the parsed value
/// unmodified so the presentation layer can raise its "unexpected result
/// format" signal instead of the core crashing or coercing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Differences {
    Invoice(InvoiceDifferences),
    Flat(Vec<DifferenceRecord>),
    Other(serde_json::Value),
}

impl Differences {
    pub fn empty_flat() -> Self {
        Self::Flat(Vec::new())
    }

    pub fn empty_invoice() -> Self {
        Self::Invoice(InvoiceDifferences::default())
    }

    /// True when a recognized shape holds no mismatches. An unrecognized
    /// shape is never considered empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Invoice(invoice) => invoice.is_empty(),
            Self::Flat(records) => records.is_empty(),
            Self::Other(_) => false,
        }
    }

    /// True when the shape is neither the flat list nor the structured
    /// invoice object.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl Default for Differences {
    fn default() -> Self {
        Self::empty_flat()
    }
}

/// Result of one prompt variant: either the differences reported by the
/// model, or the error sentinel `{ differences: [], error: "..." }` when the
/// variant's call or parse failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub differences: Differences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonResult {
    /// True when the variant completed and found no mismatches.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.differences.is_empty()
    }
}

/// Collapsed result of a comparison run: a bare `ComparisonResult` when one
/// variant ran, or both entries keyed "custom" / "default" when two did.
/// Serializes without a wrapper in the single case, exactly as consumers
/// read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompareOutcome {
    Both {
        custom: ComparisonResult,
        #[serde(rename = "default")]
        default_result: ComparisonResult,
    },
    Single(ComparisonResult),
}

impl CompareOutcome {
    /// The downloadable artifact: UTF-8, pretty-printed, empty difference
    /// sets kept as explicit empty arrays.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_parse_is_case_sensitive() {
        assert_eq!(
            DocumentCategory::parse("Invoices"),
            Some(DocumentCategory::Invoices)
        );
        assert_eq!(
            DocumentCategory::parse("Contracts"),
            Some(DocumentCategory::Contracts)
        );
        assert_eq!(DocumentCategory::parse("invoices"), None);
        assert_eq!(DocumentCategory::parse("CONTRACTS"), None);
        assert_eq!(DocumentCategory::parse(""), None);
    }

    #[test]
    fn artifact_file_name_lowercases_category() {
        assert_eq!(
            DocumentCategory::Invoices.artifact_file_name(),
            "invoices_differences.json"
        );
        assert_eq!(
            DocumentCategory::Contracts.artifact_file_name(),
            "contracts_differences.json"
        );
    }

    #[test]
    fn missing_record_values_coerce_to_empty_strings() {
        let record: DifferenceRecord =
            serde_json::from_value(json!({ "field": "CURRENCY" })).unwrap();
        assert_eq!(record.field, "CURRENCY");
        assert_eq!(record.file1_value, "");
        assert_eq!(record.file2_value, "");
        assert_eq!(record.item_index, None);
    }

    #[test]
    fn item_index_is_omitted_when_absent() {
        let header = DifferenceRecord {
            field: "INVOICE_NO".to_string(),
            file1_value: "A-1".to_string(),
            file2_value: "A-2".to_string(),
            item_index: None,
        };
        let value = serde_json::to_value(&header).unwrap();
        assert!(value.get("item_index").is_none());

        let line = DifferenceRecord {
            item_index: Some("1".to_string()),
            ..header
        };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["item_index"], "1");
    }

    #[test]
    fn differences_discriminate_known_shapes() {
        let flat: Differences = serde_json::from_value(json!([
            { "field": "Governing Law", "file1_value": "England", "file2_value": "Ireland" }
        ]))
        .unwrap();
        assert!(matches!(flat, Differences::Flat(ref records) if records.len() == 1));

        let invoice: Differences = serde_json::from_value(json!({
            "header_differences": [],
            "line_item_differences": [
                { "item_index": "2", "field": "UNIT_PRICE", "file1_value": "10", "file2_value": "12" }
            ]
        }))
        .unwrap();
        assert!(matches!(invoice, Differences::Invoice(_)));
        assert!(!invoice.is_empty());
    }

    #[test]
    fn unknown_shape_passes_through_as_other() {
        let value = json!({ "summary": "the documents differ" });
        let differences: Differences = serde_json::from_value(value.clone()).unwrap();
        assert!(differences.is_unrecognized());
        assert!(!differences.is_empty());
        assert_eq!(serde_json::to_value(&differences).unwrap(), value);
    }

    #[test]
    fn empty_sets_serialize_as_explicit_arrays() {
        let flat = ComparisonResult {
            differences: Differences::empty_flat(),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&flat).unwrap(),
            json!({ "differences": [] })
        );

        let invoice = ComparisonResult {
            differences: Differences::empty_invoice(),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&invoice).unwrap(),
            json!({
                "differences": {
                    "header_differences": [],
                    "line_item_differences": []
                }
            })
        );
    }

    #[test]
    fn outcome_single_serializes_unwrapped() {
        let outcome = CompareOutcome::Single(ComparisonResult {
            differences: Differences::empty_flat(),
            error: None,
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({ "differences": [] }));
        assert!(value.get("custom").is_none());
        assert!(value.get("default").is_none());
    }

    #[test]
    fn outcome_both_serializes_with_exact_keys() {
        let outcome = CompareOutcome::Both {
            custom: ComparisonResult {
                differences: Differences::empty_flat(),
                error: Some("Custom prompt error: boom".to_string()),
            },
            default_result: ComparisonResult {
                differences: Differences::empty_invoice(),
                error: None,
            },
        };
        let value = serde_json::to_value(&outcome).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["custom", "default"]);
    }

    #[test]
    fn outcome_round_trips_through_pretty_json() {
        let outcome = CompareOutcome::Both {
            custom: ComparisonResult {
                differences: Differences::Flat(vec![DifferenceRecord {
                    field: "Payment Terms".to_string(),
                    file1_value: "Net 30".to_string(),
                    file2_value: "Net 60".to_string(),
                    item_index: None,
                }]),
                error: None,
            },
            default_result: ComparisonResult {
                differences: Differences::empty_invoice(),
                error: None,
            },
        };

        let artifact = outcome.to_pretty_json().unwrap();
        let parsed: CompareOutcome = serde_json::from_str(&artifact).unwrap();
        assert_eq!(parsed, outcome);
    }
}
