//! Pipeline execution: one conversion request through the five ordered stages
//!
//! A [`Converter`] is immutable once built. All mutable per-call state (the
//! accumulator, the secondary-output collector, and the resolved working
//! context) lives in an invocation struct allocated fresh for every call and
//! passed explicitly through the stages, so one converter instance can serve
//! concurrent conversions without sharing state between them.
//!
//! Stages run strictly in order within one invocation: pre-hooks, field
//! conversions, object conversions, post-hooks, required-field validation.
//! Asynchronous steps are awaited sequentially, so ordering between two
//! steps is deterministic and matches registration order.
//!
//! Copyright (c) 2026 Remold Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::merge::{shallow_override, MergeStrategy};
use crate::pipeline::config::ConverterConfig;
use crate::pipeline::outcome::{Additions, Outcome};
use crate::pipeline::policy::ErrorPolicy;
use crate::pipeline::registry::{
    DeferredMember, DeferredRecord, Definitions, HookStep, ObjectStep,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A built, reusable pipeline bound to one definition set and configuration
pub struct Converter {
    definitions: Definitions,
    defaults: Value,
    context: Value,
    merge: MergeStrategy,
    logger: Arc<dyn Logger>,
    required_fields: Vec<String>,
    policy: ErrorPolicy,
}

/// Mutable state owned by a single conversion call
struct Invocation {
    context: Value,
    target: Value,
    additions: Additions,
}

impl Converter {
    pub(crate) fn from_parts(definitions: Definitions, config: ConverterConfig) -> Self {
        // Per-field required flags union into the converter-level list.
        let mut required_fields = config.required_fields.clone();
        for step in &definitions.fields {
            if step.required && !required_fields.contains(&step.name) {
                required_fields.push(step.name.clone());
            }
        }
        let defaults = match config.defaults {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Self {
            policy: ErrorPolicy::new(config.error_handling, Arc::clone(&config.logger)),
            definitions,
            defaults,
            context: config.context,
            merge: config.merge,
            logger: config.logger,
            required_fields,
        }
    }

    /// Execute one conversion request
    ///
    /// Runs the registered steps over `source` in stage order and returns
    /// the assembled [`Outcome`]. A single attempt per call; no stage ever
    /// retries. Only `Throw` mode is pipeline-fatal, and an abort does not
    /// roll back earlier accumulated state, it discards it.
    ///
    /// `context_override` shallow-overrides the converter-level context at
    /// its top-level keys for this call only.
    pub async fn convert(
        &self,
        source: &Value,
        context_override: Option<&Value>,
    ) -> Result<Outcome> {
        if !source.is_object() {
            let error = Error::InvalidSource {
                message: "source must be a non-null structured record".to_string(),
                value: Some(source.clone()),
            };
            self.policy.dispatch(error)?;
            // Warn/Ignore: behave as though no stage contributed anything.
            return Outcome::single(self.defaults.clone());
        }

        let mut call = Invocation {
            context: shallow_override(&self.context, context_override),
            target: self.defaults.clone(),
            additions: Additions::new(self.defaults.clone(), Arc::clone(&self.merge)),
        };

        self.run_hooks(&self.definitions.pre_hooks, source, &mut call, true)
            .await?;
        self.run_fields(source, &mut call).await?;
        self.run_objects(source, &mut call).await?;
        self.run_hooks(&self.definitions.post_hooks, source, &mut call, false)
            .await?;
        self.validate(&call.target)?;

        let Invocation {
            target, additions, ..
        } = call;
        if additions.is_empty() {
            Outcome::single(target)
        } else {
            Outcome::many(target, additions.into_outputs())
        }
    }

    /// Pre- or post-hook stage: hooks act on the live accumulator
    async fn run_hooks(
        &self,
        hooks: &[HookStep],
        source: &Value,
        call: &mut Invocation,
        pre: bool,
    ) -> Result<()> {
        for step in hooks {
            let run = step
                .hook
                .run(&call.context, source, &mut call.target, &mut call.additions)
                .await;
            if let Err(cause) = run {
                let error = if pre {
                    Error::PreHook {
                        label: step.label.clone(),
                        cause,
                    }
                } else {
                    Error::PostHook {
                        label: step.label.clone(),
                        cause,
                    }
                };
                self.policy.dispatch(error)?;
            }
        }
        Ok(())
    }

    /// Field stage: each result is merged as `{name: result}`
    async fn run_fields(&self, source: &Value, call: &mut Invocation) -> Result<()> {
        for step in &self.definitions.fields {
            // The snapshot excludes this step's own pending write.
            let snapshot = call.target.clone();
            match step.transform.apply(source, &call.context, &snapshot).await {
                Ok(value) => {
                    let mut contribution = Map::new();
                    contribution.insert(step.name.clone(), value);
                    call.target = (self.merge)(
                        std::mem::take(&mut call.target),
                        Value::Object(contribution),
                    );
                }
                Err(cause) => {
                    self.policy.dispatch(Error::FieldConversion {
                        field: step.name.clone(),
                        value: Some(source.clone()),
                        cause,
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Object stage: produced records merge wholesale into the accumulator
    async fn run_objects(&self, source: &Value, call: &mut Invocation) -> Result<()> {
        for step in &self.definitions.objects {
            let snapshot = call.target.clone();
            let produced = match step {
                ObjectStep::Resolved(transform) => {
                    transform.apply(source, &call.context, &snapshot).await
                }
                ObjectStep::Deferred(transform) => {
                    match transform.apply(source, &call.context, &snapshot).await {
                        Ok(record) => {
                            self.resolve_deferred(record, source, &call.context, &snapshot)
                                .await
                        }
                        Err(cause) => Err(cause),
                    }
                }
            };
            match produced {
                Ok(value) if value.is_object() => {
                    call.target = (self.merge)(std::mem::take(&mut call.target), value);
                }
                Ok(other) => {
                    // Non-record results are discarded without error.
                    self.logger.debug(
                        "object step produced a non-record value; discarded",
                        &[other],
                    );
                }
                Err(cause) => {
                    self.policy.dispatch(Error::ObjectConversion {
                        value: Some(source.clone()),
                        cause,
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Resolve the lazy members of a deferred record against the snapshot
    async fn resolve_deferred(
        &self,
        record: DeferredRecord,
        source: &Value,
        context: &Value,
        snapshot: &Value,
    ) -> anyhow::Result<Value> {
        let mut resolved = Map::new();
        for (name, member) in record.members {
            match member {
                DeferredMember::Ready(value) => {
                    resolved.insert(name, value);
                }
                DeferredMember::Lazy(transform) => {
                    let value = transform.apply(source, context, snapshot).await?;
                    resolved.insert(name, value);
                }
            }
        }
        Ok(Value::Object(resolved))
    }

    /// Required-field validation over the final accumulator
    fn validate(&self, target: &Value) -> Result<()> {
        if self.required_fields.is_empty() {
            return Ok(());
        }
        let missing: Vec<String> = self
            .required_fields
            .iter()
            .filter(|name| matches!(target.get(name.as_str()), None | Some(Value::Null)))
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            self.policy.dispatch(Error::Validation { missing })
        }
    }
}
