//! Wire models for the analyze operation and the field merge rule.

use std::collections::BTreeMap;

use cardscan_core::ExtractedFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest<'a> {
    pub url_source: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Body of `GET {Operation-Location}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    pub status: OperationStatus,
    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, DocumentField>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentField {
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Flatten every document's fields into one mapping.
///
/// Only fields carrying content are recorded. When a field name recurs in a
/// later document, the later value replaces the earlier one.
pub fn merge_documents(result: &AnalyzeResult) -> ExtractedFields {
    let mut fields = ExtractedFields::new();
    for document in &result.documents {
        for (name, field) in &document.fields {
            if let Some(ref content) = field.content {
                fields.insert(name.clone(), content.clone());
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(value: serde_json::Value) -> AnalyzeResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn records_only_fields_with_content() {
        let result = result(json!({
            "modelId": "prebuilt-creditCard",
            "documents": [{
                "docType": "creditCard",
                "fields": {
                    "CardHolderName": {"type": "string", "content": "JOHN DOE", "confidence": 0.98},
                    "CardNumber": {"type": "string", "content": "4111 1111 1111 1111"},
                    "CardVerificationValue": {"type": "string"},
                    "IssuingBank": {"type": "string", "content": null}
                }
            }]
        }));
        let fields = merge_documents(&result);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("CardHolderName"), Some("JOHN DOE"));
        assert_eq!(fields.get("CardVerificationValue"), None);
        assert_eq!(fields.get("IssuingBank"), None);
    }

    #[test]
    fn later_document_wins_for_repeated_fields() {
        let result = result(json!({
            "documents": [
                {"fields": {"CardNumber": {"content": "4111111111111111"}, "PaymentNetwork": {"content": "VISA"}}},
                {"fields": {"CardNumber": {"content": "5500005555555559"}}}
            ]
        }));
        let fields = merge_documents(&result);
        assert_eq!(fields.get("CardNumber"), Some("5500005555555559"));
        assert_eq!(fields.get("PaymentNetwork"), Some("VISA"));
    }

    #[test]
    fn no_documents_means_no_fields() {
        assert!(merge_documents(&result(json!({}))).is_empty());
    }

    #[test]
    fn unknown_status_does_not_fail_parsing() {
        let op: AnalyzeOperation = serde_json::from_value(json!({"status": "paused"})).unwrap();
        assert_eq!(op.status, OperationStatus::Unknown);
        let op: AnalyzeOperation =
            serde_json::from_value(json!({"status": "notStarted"})).unwrap();
        assert_eq!(op.status, OperationStatus::NotStarted);
    }
}
