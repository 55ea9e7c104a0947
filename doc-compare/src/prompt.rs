//! Prompt templates for the two document categories.
//!
//! The per-category field checklists are static configuration, versioned
//! with the code. Shape selection is a pure function of category and
//! variant: the invoice default requests the nested
//! header/line-item schema, the contract default and every custom prompt
//! request the flat list schema.

use crate::types::DocumentCategory;

/// Default extraction/comparison prompt for invoice pairs. Requests the
/// structured schema with separate header-level and line-item-level arrays.
pub const INVOICE_DEFAULT_PROMPT: &str = r#"
You are given two invoice documents. Extract and compare the following fields for any mismatches:

Header-level fields:
- INVOICE_NO
- INVOICE_DATE (yyyy-mm-dd)
- PURCHASE_ORDER
- SHIPMENT_NUMBER
- CONTRACT_NUMBER
- CURRENCY
- DUE_DATE
- TOTAL_TAX
- SUB_TOTAL
- TOTAL_AMOUNT
- PAYMENT_TERMS
- INCOTERMS
- CARRIER_NAME
- CARRIER_CODE
- TRANSPORT_MODE
- BOOKING_REFERENCE
- VENDOR_TAX_ID
- VENDOR_IBAN
- VENDOR_ZIP
- VENDOR_CITY
- VENDOR_NAME
- CUSTOMER_TAX_ID
- CUSTOMER_ZIP
- CUSTOMER_CITY
- CUSTOMER_NAME
- CHARGE_AMOUNT
- DISCOUNT_AMOUNT
- DELIVERY_ENTITY_TAX_ID
- DELIVERY_ENTITY_ZIP
- DELIVERY_ENTITY_CITY
- DELIVERY_ENTITY_COUNTRY
- DELIVERY_ENTITY_NAME

Line item-level fields:
- LINE_AMOUNT
- ITEM_DESCRIPTION
- ITEM_QUANTITY
- PURCHASE_ORDER
- WEIGHT_UNIT_OF_MEASUREMENT
- ITEM_NUMBER
- EXTERNAL_ITEM_NUMBER
- UNIT_PRICE
- HS_CODE
- CONTAINER_NUMBER
- CURRENCY
- CHARGE_AMOUNT
- DISCOUNT_PERCENTAGE
- DISCOUNT_AMOUNT
- TAX_CODE
- TAX_AMOUNT
- TAX_PERCENTAGE

Return the differences as structured JSON in this format:
{
  "differences": {
    "header_differences": [
      {
        "field": "HEADER_FIELD_NAME",
        "file1_value": "value from file 1",
        "file2_value": "value from file 2"
      }
    ],
    "line_item_differences": [
      {
        "item_index": "1",
        "field": "LINE_ITEM_FIELD_NAME",
        "file1_value": "value from file 1",
        "file2_value": "value from file 2"
      }
    ]
  }
}

If there are no mismatches in a category, return an empty array for that category.
If there are no mismatches at all, return:
{
  "differences": {
    "header_differences": [],
    "line_item_differences": []
  }
}
"#;

/// Default extraction/comparison prompt for contract pairs. Requests the
/// flat list schema.
pub const CONTRACT_DEFAULT_PROMPT: &str = r#"
You are given two contract documents. Carefully read and analyze both.

Your task is to extract and compare important legal, financial, and administrative fields. Identify and highlight any differences between the two documents.

Focus on the following categories:

General Information:
- Contract Number, Title, Type
- Effective Date, Expiration Date, Execution Date, Termination Date
- Contract Status, Contract Value, Currency, Renewal Terms

Payment & Financial Terms:
- Payment Terms, Payment Schedule
- Notice Period, Indemnification Terms, Warranty Terms, Insurance Requirements
- Limitation of Liability, Intellectual Property Rights

Jurisdiction & Legal Scope:
- Governing Law, Jurisdiction
- Termination Conditions, Dispute Resolution Mechanism
- Compliance Requirements, Force Majeure Clause, Confidentiality Terms

Parties & Contacts:
- Party 1 and Party 2: Name, Address, Representative, Tax ID, Contact Information

Service & Obligations:
- Service Level Agreement, Performance Metrics
- Data Protection, Exclusivity, Non-Compete, Amendment Process

Return ONLY the differences as structured JSON in this format:
{
  "differences": [
    {
      "field": "FIELD_NAME",
      "file1_value": "value from contract 1",
      "file2_value": "value from contract 2"
    }
  ]
}

If there are no differences, return: { "differences": [] }
"#;

/// Directive appended to every custom prompt so the model still returns
/// structured output regardless of what the user asked. Always the flat
/// schema, including for the Invoices category: custom prompts trade the
/// header/line-item distinction for a single uniform shape.
const CUSTOM_JSON_DIRECTIVE: &str = r#"Return ONLY JSON in this exact format:
{
    "differences": [
        {
            "field": "Field Name",
            "file1_value": "Value in first file",
            "file2_value": "Value in second file"
        }
    ]
}
If no differences, return: { "differences": [] }"#;

/// The fixed template for a category. Pure; the checklist and output shape
/// depend on nothing but the category value.
pub fn default_prompt(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::Invoices => INVOICE_DEFAULT_PROMPT,
        DocumentCategory::Contracts => CONTRACT_DEFAULT_PROMPT,
    }
}

/// Wrap arbitrary user-supplied text with the JSON-format directive.
pub fn wrap_custom_prompt(user_text: &str) -> String {
    format!("{}\n\n{}", user_text.trim(), CUSTOM_JSON_DIRECTIVE)
}
