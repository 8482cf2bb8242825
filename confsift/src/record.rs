//! The flat record type and the field-level editor.
//!
//! A [`ConfigRecord`] is one leaf of a configuration file. Its `original_key`
//! and `sensitivity` are fixed when the record is extracted; only `key` and
//! `value` can change afterwards, and only through [`update`].
//!
//! ```compile_fail
//! use confsift::{ConfigRecord, Sensitivity};
//!
//! let mut record = ConfigRecord::new("db.password", "password", "x", Sensitivity::High);
//! record.original_key = String::from("user");
//! ```
//!
//! ```compile_fail
//! use confsift::{ConfigRecord, Sensitivity};
//!
//! let mut record = ConfigRecord::new("db.password", "password", "x", Sensitivity::High);
//! record.sensitivity = Sensitivity::Low;
//! ```

use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::policy::MaskPolicies;
use crate::sensitivity::{Sensitivity, SensitivityRules};

/// One flattened configuration entry.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    key: String,
    original_key: String,
    value: String,
    sensitivity: Sensitivity,
}

impl ConfigRecord {
    pub fn new(
        key: impl Into<String>,
        original_key: impl Into<String>,
        value: impl Into<String>,
        sensitivity: Sensitivity,
    ) -> Self {
        Self {
            key: key.into(),
            original_key: original_key.into(),
            value: value.into(),
            sensitivity,
        }
    }

    /// Builds a record whose sensitivity comes from `rules` applied to
    /// `original_key`.
    pub fn classified(
        key: impl Into<String>,
        original_key: impl Into<String>,
        value: impl Into<String>,
        rules: &SensitivityRules,
    ) -> Self {
        let original_key = original_key.into();
        let sensitivity = rules.classify(&original_key);
        Self::new(key, original_key, value, sensitivity)
    }

    /// Full dotted path (JSON) or the attribute key (markup).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Leaf name as it appeared in the source file.
    pub fn original_key(&self) -> &str {
        &self.original_key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Key => &self.key,
            RecordField::Value => &self.value,
        }
    }

    /// The value as the built-in masking table shows it.
    pub fn masked_value(&self) -> String {
        MaskPolicies::builtin().mask(self.sensitivity, &self.value)
    }

    pub fn masked_value_with(&self, policies: &MaskPolicies) -> String {
        policies.mask(self.sensitivity, &self.value)
    }

    fn replace(&mut self, field: RecordField, text: String) -> String {
        match field {
            RecordField::Key => mem::replace(&mut self.key, text),
            RecordField::Value => mem::replace(&mut self.value, text),
        }
    }
}

// Values are masked by sensitivity unless building tests or with `testing`.
impl fmt::Debug for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(any(test, feature = "testing"))]
        let value = self.value.clone();
        #[cfg(not(any(test, feature = "testing")))]
        let value = self.masked_value();

        f.debug_struct("ConfigRecord")
            .field("key", &self.key)
            .field("original_key", &self.original_key)
            .field("value", &value)
            .field("sensitivity", &self.sensitivity)
            .finish()
    }
}

/// Editable fields of a [`ConfigRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
    Key,
    Value,
}

impl RecordField {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordField::Key => "key",
            RecordField::Value => "value",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replaces one field of `records[index]` and returns the previous text.
///
/// Everything else stays as it was: the other field, `original_key`,
/// `sensitivity`, the other records and their order. Renaming a key does
/// not reclassify the record.
pub fn update(
    records: &mut [ConfigRecord],
    index: usize,
    field: RecordField,
    new_value: impl Into<String>,
) -> Result<String, IndexError> {
    let len = records.len();
    let record = records.get_mut(index).ok_or(IndexError { index, len })?;
    Ok(record.replace(field, new_value.into()))
}
