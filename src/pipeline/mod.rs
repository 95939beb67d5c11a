//! Conversion pipeline: registration, configuration, execution, results
//!
//! A converter is built once from a definition closure and a fixed
//! configuration, then invoked any number of times; each invocation runs
//! the five ordered stages over a fresh per-call state and produces an
//! independent [`Outcome`].
//!
//! Copyright (c) 2026 Remold Team
//! Licensed under the Apache-2.0 license

pub mod config;
pub mod outcome;
pub mod registry;
pub mod runner;

mod policy;

use crate::error::Result;
use serde_json::Value;

pub use config::ConverterConfig;
pub use outcome::{Additions, Outcome};
pub use registry::{
    DeferredMember, DeferredObjectTransform, DeferredRecord, Definitions, FieldOptions,
    FieldTransform, Hook, ObjectTransform,
};
pub use runner::Converter;

/// Build a converter from a definition closure and configuration
///
/// The closure registers field steps, object steps, and hooks on the
/// supplied [`Definitions`]; registration failures (such as an empty field
/// name) abort the build immediately regardless of the configured error
/// mode.
///
/// # Example
///
/// ```
/// use remold::{build, helpers, ConverterConfig};
/// use serde_json::json;
///
/// # fn main() -> remold::Result<()> {
/// let converter = build(
///     |defs| {
///         defs.field("id", helpers::copy("user_id"))?
///             .field("name", helpers::copy("user_name"))?;
///         Ok(())
///     },
///     ConverterConfig::default(),
/// )?;
///
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .build()
///     .unwrap();
/// let outcome = runtime.block_on(
///     converter.convert(&json!({"user_id": "123", "user_name": "JohnDoe"}), None),
/// )?;
/// assert_eq!(outcome.primary(), &json!({"id": "123", "name": "JohnDoe"}));
/// # Ok(())
/// # }
/// ```
pub fn build<D>(define: D, config: ConverterConfig) -> Result<Converter>
where
    D: FnOnce(&mut Definitions) -> Result<()>,
{
    let mut definitions = Definitions::new();
    define(&mut definitions)?;
    Ok(Converter::from_parts(definitions, config))
}

/// Structural pairing of two independently built converters
///
/// The two directions share no state; this is purely a naming convenience
/// for systems that convert the same shapes both ways.
pub struct Bidirectional {
    pub forward: Converter,
    pub reverse: Converter,
}

impl Bidirectional {
    pub fn new(forward: Converter, reverse: Converter) -> Self {
        Self { forward, reverse }
    }

    /// Convert through the forward direction
    pub async fn convert_forward(
        &self,
        source: &Value,
        context_override: Option<&Value>,
    ) -> Result<Outcome> {
        self.forward.convert(source, context_override).await
    }

    /// Convert through the reverse direction
    pub async fn convert_reverse(
        &self,
        source: &Value,
        context_override: Option<&Value>,
    ) -> Result<Outcome> {
        self.reverse.convert(source, context_override).await
    }
}
