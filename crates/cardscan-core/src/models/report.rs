use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fields::CardField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    /// Every schema field was detected
    Full,
    /// Something was extracted, but not every schema field
    Partial,
    /// Nothing was extracted
    None,
}

/// Verdict for a single schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldVerdict {
    pub field: CardField,
    /// Raw extracted value, if any. Blank values are kept as extracted.
    pub value: Option<String>,
    pub valid: bool,
}

/// Completeness score of an extraction against the card schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationReport {
    /// One verdict per schema field, in schema order
    pub fields: Vec<FieldVerdict>,
    pub valid_count: usize,
    pub total_count: usize,
    pub status: ValidationStatus,
}

impl ValidationReport {
    pub fn verdict(&self, field: CardField) -> Option<&FieldVerdict> {
        self.fields.iter().find(|v| v.field == field)
    }

    pub fn is_valid(&self, field: CardField) -> bool {
        self.verdict(field).map(|v| v.valid).unwrap_or(false)
    }
}
