//! Card field validation
//!
//! A field is valid when it was extracted with at least one non-whitespace
//! character. Only the six [`CardField`]s are scored, so `total_count` is
//! always six regardless of extra vendor fields in the extraction.

use crate::models::{CardField, ExtractedFields, FieldVerdict, ValidationReport, ValidationStatus};

/// True iff the value is present and non-empty after trimming.
pub fn is_field_valid(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Score an extraction against the card schema.
pub fn validate(extracted: &ExtractedFields) -> ValidationReport {
    let fields: Vec<FieldVerdict> = CardField::ALL
        .into_iter()
        .map(|field| {
            let value = extracted.field(field);
            let valid = is_field_valid(value);
            if !valid {
                tracing::debug!(field = %field, "Field validation failed");
            }
            FieldVerdict {
                field,
                value: value.map(str::to_string),
                valid,
            }
        })
        .collect();

    let valid_count = fields.iter().filter(|v| v.valid).count();
    let total_count = fields.len();

    let status = if extracted.is_empty() {
        ValidationStatus::None
    } else if total_count > 0 && valid_count == total_count {
        ValidationStatus::Full
    } else {
        ValidationStatus::Partial
    };

    ValidationReport {
        fields,
        valid_count,
        total_count,
        status,
    }
}
