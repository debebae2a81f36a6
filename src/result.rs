//! Extraction output types.
//!
//! An [`ExtractionResult`] is created fresh per document and discarded once
//! the caller has copied values into its own article representation. The
//! trace records, for every declared field, which candidate won (or that the
//! chain was exhausted) -- exhaustion of optional fields is visible here but
//! is never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SelectorKind;

/// Value resolved for one field: a single string, or an ordered list when
/// the field was declared with `all: true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// First (or only) value.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::Many(values) => values.first().map(String::as_str),
        }
    }

    /// All values as a slice, regardless of arity.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            FieldValue::Single(value) => std::slice::from_ref(value),
            FieldValue::Many(values) => values,
        }
    }
}

/// How a field's fallback chain terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// A candidate produced at least one non-empty value; later candidates
    /// were never evaluated.
    Matched {
        /// Zero-based index into the field's candidate list.
        candidate: usize,
        /// Query language of the winning candidate.
        kind: SelectorKind,
    },
    /// Every candidate was tried and none matched.
    Exhausted,
}

impl Resolution {
    /// True when a candidate matched.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }
}

/// Field map plus per-field resolution trace for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Resolved field values, keyed by field name.
    pub fields: BTreeMap<String, FieldValue>,
    /// Resolution outcome for every declared field, matched or not.
    pub trace: BTreeMap<String, Resolution>,
}

impl ExtractionResult {
    /// First (or only) value of a field, if it resolved.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::first)
    }

    /// All values of a field, if it resolved.
    #[must_use]
    pub fn get_all(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(FieldValue::values)
    }

    /// Resolution outcome for a declared field.
    #[must_use]
    pub fn resolution(&self, field: &str) -> Option<Resolution> {
        self.trace.get(field).copied()
    }

    pub(crate) fn record(&mut self, field: &str, value: Option<FieldValue>, trace: Resolution) {
        if let Some(value) = value {
            self.fields.insert(field.to_string(), value);
        }
        self.trace.insert(field.to_string(), trace);
    }
}
