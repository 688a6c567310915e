use std::collections::btree_map::{BTreeMap, Iter};
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::locale::Locale;

/// The fixed schema of credit card fields scored by validation, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum CardField {
    CardHolderName,
    CardNumber,
    ExpirationDate,
    CardVerificationValue,
    PaymentNetwork,
    IssuingBank,
}

impl CardField {
    pub const ALL: [CardField; 6] = [
        CardField::CardHolderName,
        CardField::CardNumber,
        CardField::ExpirationDate,
        CardField::CardVerificationValue,
        CardField::PaymentNetwork,
        CardField::IssuingBank,
    ];

    /// Field name as reported by the extraction model.
    pub fn as_str(self) -> &'static str {
        match self {
            CardField::CardHolderName => "CardHolderName",
            CardField::CardNumber => "CardNumber",
            CardField::ExpirationDate => "ExpirationDate",
            CardField::CardVerificationValue => "CardVerificationValue",
            CardField::PaymentNetwork => "PaymentNetwork",
            CardField::IssuingBank => "IssuingBank",
        }
    }

    pub fn from_name(name: &str) -> Option<CardField> {
        CardField::ALL.into_iter().find(|f| f.as_str() == name)
    }

    pub fn display_name(self, locale: Locale) -> &'static str {
        locale.field_label(self)
    }
}

impl Display for CardField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Field name to extracted value, as returned by the document extractor.
///
/// May hold vendor fields outside [`CardField`]; validation ignores them.
/// A missing key and a blank value both mean "not detected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ExtractedFields(BTreeMap<String, String>);

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any earlier one for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn field(&self, field: CardField) -> Option<&str> {
        self.get(field.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtractedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = ExtractedFields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl<'a> IntoIterator for &'a ExtractedFields {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
