//! Conversion result container and the secondary-output collector
//!
//! A conversion produces one mandatory primary output and zero or more
//! secondary outputs registered by hooks. The container is an explicit sum
//! type rather than a sequence that is "sometimes exactly one element", so
//! callers go through the accessors instead of branching on shape.
//!
//! Copyright (c) 2026 Remold Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::merge::MergeStrategy;
use serde_json::Value;

/// Result of one conversion: a single target, or a primary plus additionals
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Exactly one output record
    Single(Value),
    /// A primary output followed by secondary outputs in add order
    ///
    /// `additional` is never empty; a Many with no additionals is
    /// constructed as `Single`.
    Many {
        primary: Value,
        additional: Vec<Value>,
    },
}

impl Outcome {
    /// Wrap a single output record
    ///
    /// Fails if the primary is null; every conversion result must have a
    /// defined primary.
    pub fn single(value: Value) -> Result<Self> {
        Self::check_primary(&value)?;
        Ok(Outcome::Single(value))
    }

    /// Wrap a primary output and its secondary outputs
    ///
    /// Fails if the primary is null. An empty `additional` sequence
    /// collapses to [`Outcome::Single`].
    pub fn many(primary: Value, additional: Vec<Value>) -> Result<Self> {
        Self::check_primary(&primary)?;
        if additional.is_empty() {
            Ok(Outcome::Single(primary))
        } else {
            Ok(Outcome::Many {
                primary,
                additional,
            })
        }
    }

    fn check_primary(primary: &Value) -> Result<()> {
        if primary.is_null() {
            return Err(Error::InvalidSource {
                message: "conversion result primary must not be null".to_string(),
                value: Some(Value::Null),
            });
        }
        Ok(())
    }

    /// The primary output; always a defined value
    pub fn primary(&self) -> &Value {
        match self {
            Outcome::Single(value) => value,
            Outcome::Many { primary, .. } => primary,
        }
    }

    /// Secondary outputs in add order; empty for a single result
    pub fn additional(&self) -> &[Value] {
        match self {
            Outcome::Single(_) => &[],
            Outcome::Many { additional, .. } => additional,
        }
    }

    /// Whether any secondary outputs were produced
    pub fn has_additional(&self) -> bool {
        !self.additional().is_empty()
    }

    /// Total number of output records, primary included
    pub fn len(&self) -> usize {
        1 + self.additional().len()
    }

    /// An outcome always holds at least the primary
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate all outputs, primary first
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        std::iter::once(self.primary()).chain(self.additional().iter())
    }

    /// Consume the outcome into a vector, primary first
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Outcome::Single(value) => vec![value],
            Outcome::Many {
                primary,
                mut additional,
            } => {
                additional.insert(0, primary);
                additional
            }
        }
    }
}

/// Invocation-scoped collector behind the hook `add` operation
///
/// Allocated fresh for every conversion call; secondary outputs never leak
/// between invocations. Each added record is normalized against the
/// configured defaults through the converter's merge strategy at the moment
/// it is added.
pub struct Additions {
    outputs: Vec<Value>,
    defaults: Value,
    merge: MergeStrategy,
}

impl Additions {
    pub(crate) fn new(defaults: Value, merge: MergeStrategy) -> Self {
        Self {
            outputs: Vec::new(),
            defaults,
            merge,
        }
    }

    /// Register one fully-formed secondary output
    pub fn add(&mut self, output: Value) {
        let normalized = (self.merge)(self.defaults.clone(), output);
        self.outputs.push(normalized);
    }

    /// Number of secondary outputs registered so far
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub(crate) fn into_outputs(self) -> Vec<Value> {
        self.outputs
    }
}

impl std::fmt::Debug for Additions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Additions")
            .field("outputs", &self.outputs)
            .field("defaults", &self.defaults)
            .finish()
    }
}
