//! Step registration for the conversion pipeline
//!
//! Steps form a closed set of typed variants collected through the
//! [`Definitions`] builder at converter construction time, so malformed
//! registrations are rejected by the type system instead of being
//! discovered by runtime callable checks.
//!
//! Plain synchronous closures implement the step traits out of the box;
//! asynchronous steps implement the corresponding trait on their own type
//! with `#[async_trait]`.
//!
//! Copyright (c) 2026 Remold Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::pipeline::outcome::Additions;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A transform producing the value of exactly one named output member
///
/// `target` is a snapshot of the accumulator taken before this step's own
/// contribution: the step observes everything earlier stages wrote, but
/// never its own pending write.
#[async_trait]
pub trait FieldTransform: Send + Sync {
    async fn apply(&self, source: &Value, context: &Value, target: &Value)
        -> anyhow::Result<Value>;
}

#[async_trait]
impl<F> FieldTransform for F
where
    F: Fn(&Value, &Value, &Value) -> anyhow::Result<Value> + Send + Sync,
{
    async fn apply(
        &self,
        source: &Value,
        context: &Value,
        target: &Value,
    ) -> anyhow::Result<Value> {
        (self)(source, context, target)
    }
}

/// A transform producing a partial record merged wholesale into the output
///
/// A non-record result is discarded without error.
#[async_trait]
pub trait ObjectTransform: Send + Sync {
    async fn apply(&self, source: &Value, context: &Value, target: &Value)
        -> anyhow::Result<Value>;
}

#[async_trait]
impl<F> ObjectTransform for F
where
    F: Fn(&Value, &Value, &Value) -> anyhow::Result<Value> + Send + Sync,
{
    async fn apply(
        &self,
        source: &Value,
        context: &Value,
        target: &Value,
    ) -> anyhow::Result<Value> {
        (self)(source, context, target)
    }
}

/// A whole-object transform whose record may carry deferred members
///
/// This is the structural replacement for inspecting produced records for
/// callable members at run time: a member is either [`DeferredMember::Ready`]
/// or a computation resolved by the pipeline before the merge.
#[async_trait]
pub trait DeferredObjectTransform: Send + Sync {
    async fn apply(
        &self,
        source: &Value,
        context: &Value,
        target: &Value,
    ) -> anyhow::Result<DeferredRecord>;
}

#[async_trait]
impl<F> DeferredObjectTransform for F
where
    F: Fn(&Value, &Value, &Value) -> anyhow::Result<DeferredRecord> + Send + Sync,
{
    async fn apply(
        &self,
        source: &Value,
        context: &Value,
        target: &Value,
    ) -> anyhow::Result<DeferredRecord> {
        (self)(source, context, target)
    }
}

/// One member of a [`DeferredRecord`]
pub enum DeferredMember {
    /// A plain value merged as-is
    Ready(Value),
    /// A computation invoked with `(source, context, snapshot)` and awaited
    Lazy(Arc<dyn FieldTransform>),
}

/// A record built by a [`DeferredObjectTransform`], member order preserved
#[derive(Default)]
pub struct DeferredRecord {
    pub(crate) members: Vec<(String, DeferredMember)>,
}

impl DeferredRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already-resolved member
    pub fn ready(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.push((name.into(), DeferredMember::Ready(value)));
        self
    }

    /// Add a member resolved against the live snapshot during the object stage
    pub fn lazy<T>(mut self, name: impl Into<String>, transform: T) -> Self
    where
        T: FieldTransform + 'static,
    {
        self.members
            .push((name.into(), DeferredMember::Lazy(Arc::new(transform))));
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A side-effecting step run before or after the field/object stages
///
/// Hooks act on the live accumulator (no merge step follows them) and may
/// register secondary outputs through [`Additions::add`].
#[async_trait]
pub trait Hook: Send + Sync {
    async fn run(
        &self,
        context: &Value,
        source: &Value,
        target: &mut Value,
        additions: &mut Additions,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> Hook for F
where
    F: Fn(&Value, &Value, &mut Value, &mut Additions) -> anyhow::Result<()> + Send + Sync,
{
    async fn run(
        &self,
        context: &Value,
        source: &Value,
        target: &mut Value,
        additions: &mut Additions,
    ) -> anyhow::Result<()> {
        (self)(context, source, target, additions)
    }
}

/// Options accepted by field registration
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldOptions {
    /// Mark the field as required; unioned into the converter's required set
    pub required: bool,
}

pub(crate) struct FieldStep {
    pub(crate) name: String,
    pub(crate) transform: Arc<dyn FieldTransform>,
    pub(crate) required: bool,
}

pub(crate) enum ObjectStep {
    Resolved(Arc<dyn ObjectTransform>),
    Deferred(Arc<dyn DeferredObjectTransform>),
}

pub(crate) struct HookStep {
    pub(crate) label: String,
    pub(crate) hook: Arc<dyn Hook>,
}

/// The set of steps a converter is built from, in registration order
///
/// Populated exactly once, by the definition closure passed to
/// [`build`](crate::build); registration never touches a source value.
#[derive(Default)]
pub struct Definitions {
    pub(crate) fields: Vec<FieldStep>,
    pub(crate) objects: Vec<ObjectStep>,
    pub(crate) pre_hooks: Vec<HookStep>,
    pub(crate) post_hooks: Vec<HookStep>,
}

impl fmt::Debug for Definitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definitions")
            .field("fields", &self.fields.len())
            .field("objects", &self.objects.len())
            .field("pre_hooks", &self.pre_hooks.len())
            .field("post_hooks", &self.post_hooks.len())
            .finish()
    }
}

impl Definitions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a field step; execution order follows registration order
    pub fn field<T>(&mut self, name: impl Into<String>, transform: T) -> Result<&mut Self>
    where
        T: FieldTransform + 'static,
    {
        self.field_with(name, transform, FieldOptions::default())
    }

    /// Register a field step with options
    ///
    /// Fails with [`Error::InvalidField`] if the name is empty; registration
    /// errors raise immediately regardless of the configured error mode.
    pub fn field_with<T>(
        &mut self,
        name: impl Into<String>,
        transform: T,
        options: FieldOptions,
    ) -> Result<&mut Self>
    where
        T: FieldTransform + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidField {
                message: "field name must be a non-empty string".to_string(),
            });
        }
        self.fields.push(FieldStep {
            name,
            transform: Arc::new(transform),
            required: options.required,
        });
        Ok(self)
    }

    /// Register a whole-object step producing a fully resolved record
    pub fn obj<T>(&mut self, transform: T) -> &mut Self
    where
        T: ObjectTransform + 'static,
    {
        self.objects.push(ObjectStep::Resolved(Arc::new(transform)));
        self
    }

    /// Register a whole-object step whose record may carry deferred members
    pub fn obj_deferred<T>(&mut self, transform: T) -> &mut Self
    where
        T: DeferredObjectTransform + 'static,
    {
        self.objects.push(ObjectStep::Deferred(Arc::new(transform)));
        self
    }

    /// Register a pre-hook with the default label
    pub fn pre<H>(&mut self, hook: H) -> &mut Self
    where
        H: Hook + 'static,
    {
        self.pre_labeled(hook, "anonymous")
    }

    /// Register a pre-hook with a diagnostic label
    pub fn pre_labeled<H>(&mut self, hook: H, label: impl Into<String>) -> &mut Self
    where
        H: Hook + 'static,
    {
        self.pre_hooks.push(HookStep {
            label: label.into(),
            hook: Arc::new(hook),
        });
        self
    }

    /// Register a post-hook with the default label
    pub fn post<H>(&mut self, hook: H) -> &mut Self
    where
        H: Hook + 'static,
    {
        self.post_labeled(hook, "anonymous")
    }

    /// Register a post-hook with a diagnostic label
    pub fn post_labeled<H>(&mut self, hook: H, label: impl Into<String>) -> &mut Self
    where
        H: Hook + 'static,
    {
        self.post_hooks.push(HookStep {
            label: label.into(),
            hook: Arc::new(hook),
        });
        self
    }
}
