//! Merge strategies for folding partial contributions into the accumulator
//!
//! A converter carries exactly one [`MergeStrategy`], applied at every merge
//! point: field results, object-stage results, and secondary-output
//! normalization. The default is [`deep_merge`].

use serde_json::Value;
use std::sync::Arc;

/// Pluggable combining function: `merge(target, source) -> merged`
///
/// Must be pure and total; the pipeline never expects a merge to fail.
pub type MergeStrategy = Arc<dyn Fn(Value, Value) -> Value + Send + Sync>;

/// Default recursive structural merge
///
/// Objects merge key-by-key recursively, arrays concatenate, and for any
/// other type pairing the `source` value wins outright.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target), Value::Object(source)) => {
            for (key, incoming) in source {
                match target.remove(&key) {
                    Some(existing) => {
                        target.insert(key, deep_merge(existing, incoming));
                    }
                    None => {
                        target.insert(key, incoming);
                    }
                }
            }
            Value::Object(target)
        }
        (Value::Array(mut target), Value::Array(source)) => {
            target.extend(source);
            Value::Array(target)
        }
        (_, source) => source,
    }
}

/// Alternative strategy: top-level key replacement only
///
/// Objects combine at their top-level keys with the `source` side replacing
/// wholesale; no recursion and no sequence concatenation. Useful when
/// last-writer-wins semantics are wanted for every value kind.
pub fn shallow_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target), Value::Object(source)) => {
            for (key, incoming) in source {
                target.insert(key, incoming);
            }
            Value::Object(target)
        }
        (_, source) => source,
    }
}

/// The default strategy wrapped for converter configuration
pub fn default_strategy() -> MergeStrategy {
    Arc::new(deep_merge)
}

/// Shallow top-level-key override, used only for context resolution
///
/// Keys of the overlay replace keys of the base wholesale; nested records
/// are not combined.
pub(crate) fn shallow_override(base: &Value, overlay: Option<&Value>) -> Value {
    match overlay {
        None | Some(Value::Null) => base.clone(),
        Some(Value::Object(overlay)) => match base {
            Value::Object(base) => {
                let mut merged = base.clone();
                for (key, value) in overlay {
                    merged.insert(key.clone(), value.clone());
                }
                Value::Object(merged)
            }
            _ => Value::Object(overlay.clone()),
        },
        Some(other) => other.clone(),
    }
}
