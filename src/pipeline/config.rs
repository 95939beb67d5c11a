//! Converter configuration
//!
//! Configuration is fixed at construction time; a built converter never
//! changes its defaults, merge strategy, logging sink, or error mode.
//!
//! Copyright (c) 2026 Remold Team
//! Licensed under the Apache-2.0 license

use crate::error::ErrorMode;
use crate::logging::{Logger, NullLogger};
use crate::merge::{self, MergeStrategy};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Options recognized by [`build`](crate::build)
#[derive(Clone)]
pub struct ConverterConfig {
    /// Initial contents of the accumulator for every conversion
    pub defaults: Value,
    /// Converter-level default context, shallow-overridden per call
    pub context: Value,
    /// Merge strategy applied at every merge point of this converter
    pub merge: MergeStrategy,
    /// Diagnostics sink; defaults to a no-op implementation
    pub logger: Arc<dyn Logger>,
    /// Target keys that must be present and non-null after all stages
    pub required_fields: Vec<String>,
    /// Failure policy for run-time errors inside steps
    pub error_handling: ErrorMode,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            defaults: Value::Object(Map::new()),
            context: Value::Object(Map::new()),
            merge: merge::default_strategy(),
            logger: Arc::new(NullLogger),
            required_fields: Vec::new(),
            error_handling: ErrorMode::Throw,
        }
    }
}

impl ConverterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    pub fn merge_strategy(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    /// Convenience for plain merge functions
    pub fn merge_fn<F>(mut self, merge: F) -> Self
    where
        F: Fn(Value, Value) -> Value + Send + Sync + 'static,
    {
        self.merge = Arc::new(merge);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn error_handling(mut self, mode: ErrorMode) -> Self {
        self.error_handling = mode;
        self
    }
}
