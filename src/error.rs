//! Error types for settings loading

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a settings field could not be bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    InvalidValue { value: String, expected: &'static str },
    NotUnicode,
}

/// A single field that failed validation, named by its environment key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Missing,
        }
    }

    pub fn invalid(field: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::InvalidValue {
                value: value.into(),
                expected,
            },
        }
    }

    pub fn not_unicode(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::NotUnicode,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{}: field required", self.field),
            FieldErrorKind::InvalidValue { value, expected } => {
                write!(f, "{}: expected {}, got {:?}", self.field, expected, value)
            }
            FieldErrorKind::NotUnicode => write!(f, "{}: value is not valid UTF-8", self.field),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to read environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("{} invalid setting(s): {}", .0.len(), join_fields(.0))]
    Invalid(Vec<FieldError>),
}

impl ConfigurationError {
    /// Field-level errors, empty for env file failures.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ConfigurationError::Invalid(errors) => errors,
            ConfigurationError::EnvFile { .. } => &[],
        }
    }

    pub fn names_field(&self, field: &str) -> bool {
        self.field_errors().iter().any(|e| e.field == field)
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
