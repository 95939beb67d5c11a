//! Built-in field transform helpers for common operations
//!
//! Pure, stateless constructors covering the frequent cases: copying a
//! source member, injecting constants, string casing, and scalar parsing.
//! Each returns a closure usable directly as a field step; none of them
//! interact with pipeline internals.

use anyhow::Context;
use serde_json::Value;

/// Copy a top-level source member verbatim; null if absent
pub fn copy(key: impl Into<String>) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let key = key.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        Ok(source.get(&key).cloned().unwrap_or(Value::Null))
    }
}

/// Always produce the given value
pub fn constant(value: Value) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    move |_: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> { Ok(value.clone()) }
}

/// Copy a source member, substituting a fallback when missing or null
pub fn default_value(
    key: impl Into<String>,
    fallback: Value,
) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let key = key.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        match source.get(&key) {
            None | Some(Value::Null) => Ok(fallback.clone()),
            Some(value) => Ok(value.clone()),
        }
    }
}

/// Uppercase a string-valued source member
pub fn uppercase(
    key: impl Into<String>,
) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let key = key.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        Ok(Value::String(expect_str(source, &key)?.to_uppercase()))
    }
}

/// Lowercase a string-valued source member
pub fn lowercase(
    key: impl Into<String>,
) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let key = key.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        Ok(Value::String(expect_str(source, &key)?.to_lowercase()))
    }
}

/// Trim surrounding whitespace from a string-valued source member
pub fn trim(key: impl Into<String>) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let key = key.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        Ok(Value::String(expect_str(source, &key)?.trim().to_string()))
    }
}

/// Parse a string-valued source member into a number
pub fn string_to_number(
    key: impl Into<String>,
) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let key = key.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        let raw = expect_str(source, &key)?;
        let parsed: f64 = raw
            .parse()
            .with_context(|| format!("cannot parse '{}' at '{}' as a number", raw, key))?;
        serde_json::Number::from_f64(parsed)
            .map(Value::Number)
            .with_context(|| format!("'{}' at '{}' is not a representable number", raw, key))
    }
}

/// Render a numeric source member as a string
pub fn number_to_string(
    key: impl Into<String>,
) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let key = key.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        match source.get(&key) {
            Some(Value::Number(n)) => Ok(Value::String(n.to_string())),
            other => anyhow::bail!(
                "expected a number at '{}', found {:?}",
                key,
                other.unwrap_or(&Value::Null)
            ),
        }
    }
}

/// Join several string-valued source members with a separator
pub fn concat(
    keys: &[&str],
    separator: impl Into<String>,
) -> impl Fn(&Value, &Value, &Value) -> anyhow::Result<Value> {
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    let separator = separator.into();
    move |source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
        let mut parts = Vec::with_capacity(keys.len());
        for key in &keys {
            parts.push(expect_str(source, key)?.to_string());
        }
        Ok(Value::String(parts.join(&separator)))
    }
}

fn expect_str<'a>(source: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    source
        .get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("expected a string at '{}'", key))
}
