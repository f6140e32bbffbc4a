//! Field-keyed validation error map.
//!
//! Local validators and server responses both produce a [`FieldErrors`], so a
//! caller has a single shape to render regardless of where a failure came from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Classifies a single field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    Duplicate,
    OutOfRange,
    Invalid,
    Immutable,
    /// Reported by the remote store; no finer classification available.
    Server,
}

/// One error attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
}

/// Errors keyed by field name, plus an optional human-readable summary.
///
/// Nested item errors use dotted paths, e.g. `faqs.2.question`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, Vec<FieldError>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error map carrying only a summary message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Builds an error map from a server response body (`field -> [messages]`).
    pub fn from_server(
        message: Option<String>,
        fields: impl IntoIterator<Item = (String, Vec<String>)>,
    ) -> Self {
        let mut errors = Self {
            message,
            fields: BTreeMap::new(),
        };
        for (field, messages) in fields {
            for m in messages {
                errors.add(field.clone(), ErrorCode::Server, m);
            }
        }
        errors
    }

    /// Records an error against a field.
    pub fn add(&mut self, field: impl Into<String>, code: ErrorCode, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(FieldError {
            code,
            message: message.into(),
        });
    }

    /// True when there are no field errors and no summary message.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.message.is_none()
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Errors recorded for a field.
    pub fn get(&self, field: &str) -> &[FieldError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a field has any error.
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether a field has an error with the given code.
    pub fn has_code(&self, field: &str, code: ErrorCode) -> bool {
        self.get(field).iter().any(|e| e.code == code)
    }

    /// First message recorded for a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(|e| e.message.as_str())
    }

    /// Iterates over `(field, errors)` pairs in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Folds another error map into this one. Messages are kept from `self`
    /// unless it has none.
    pub fn merge(&mut self, other: FieldErrors) {
        if self.message.is_none() {
            self.message = other.message;
        }
        for (field, errs) in other.fields {
            self.fields.entry(field).or_default().extend(errs);
        }
    }

    /// Folds another error map in under a path prefix (`prefix.field`).
    pub fn nest(&mut self, prefix: &str, other: FieldErrors) {
        for (field, errs) in other.fields {
            self.fields
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(errs);
        }
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(m) = &self.message {
            f.write_str(m)?;
            if !self.fields.is_empty() {
                f.write_str(": ")?;
            }
        }
        let mut first = true;
        for (field, errs) in &self.fields {
            for e in errs {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {}", e.message)?;
                first = false;
            }
        }
        Ok(())
    }
}
