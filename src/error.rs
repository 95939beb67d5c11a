//! Error types for the remold conversion pipeline
//!
//! This module defines the typed failure taxonomy for the library, using
//! thiserror for ergonomic error definitions and anyhow to carry the
//! original cause raised inside user-supplied steps.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Main error type for conversion operations
///
/// Registration-time kinds (`InvalidField`) always raise immediately,
/// regardless of the configured [`ErrorMode`], since they indicate a
/// programming error in pipeline construction. Run-time kinds are routed
/// through the converter's failure policy.
#[derive(Error, Debug)]
pub enum Error {
    /// The conversion input was not a non-null structured record
    #[error("Invalid source: {message}")]
    InvalidSource {
        message: String,
        /// The offending input value, when one was supplied
        value: Option<Value>,
    },

    /// A field step was registered with an empty or invalid name
    #[error("Invalid field registration: {message}")]
    InvalidField { message: String },

    /// A field transform raised during the field stage
    #[error("Field conversion failed for '{field}': {cause}")]
    FieldConversion {
        field: String,
        value: Option<Value>,
        #[source]
        cause: anyhow::Error,
    },

    /// A whole-object transform raised during the object stage
    #[error("Object conversion failed: {cause}")]
    ObjectConversion {
        value: Option<Value>,
        #[source]
        cause: anyhow::Error,
    },

    /// A pre-hook raised before the field stage
    #[error("Pre-hook '{label}' failed: {cause}")]
    PreHook {
        label: String,
        #[source]
        cause: anyhow::Error,
    },

    /// A post-hook raised after the object stage
    #[error("Post-hook '{label}' failed: {cause}")]
    PostHook {
        label: String,
        #[source]
        cause: anyhow::Error,
    },

    /// Required target fields were missing or null after all stages
    #[error("Validation failed: missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The name of the output field this error concerns, if any
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Error::FieldConversion { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Values worth forwarding to the logging sink alongside the message
    pub(crate) fn detail_values(&self) -> Vec<Value> {
        match self {
            Error::InvalidSource { value, .. }
            | Error::FieldConversion { value, .. }
            | Error::ObjectConversion { value, .. } => value.iter().cloned().collect(),
            Error::Validation { missing } => vec![Value::Array(
                missing.iter().map(|m| Value::String(m.clone())).collect(),
            )],
            _ => Vec::new(),
        }
    }
}

/// Failure policy for run-time errors inside pipeline steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Raise immediately; no further stages run
    #[default]
    Throw,
    /// Emit through the logging sink at error severity and continue
    Warn,
    /// Continue without emitting anything through the logging sink
    Ignore,
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMode::Throw => write!(f, "throw"),
            ErrorMode::Warn => write!(f, "warn"),
            ErrorMode::Ignore => write!(f, "ignore"),
        }
    }
}
