//! End-to-end integration tests for the conversion pipeline
//!
//! These tests exercise the public surface the way an application would:
//! building converters from definition closures and running them over
//! JSON sources.

use remold::{
    async_trait, build, helpers, Additions, ConverterConfig, Error, ErrorMode, FieldTransform,
    Logger, Outcome,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingLogger {
    errors: Mutex<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn debug(&self, _message: &str, _details: &[Value]) {}
    fn info(&self, _message: &str, _details: &[Value]) {}
    fn warn(&self, _message: &str, _details: &[Value]) {}
    fn error(&self, message: &str, _details: &[Value]) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[tokio::test]
async fn test_basic_field_mapping() {
    let converter = build(
        |defs| {
            defs.field("id", helpers::copy("user_id"))?
                .field("name", helpers::copy("user_name"))?;
            Ok(())
        },
        ConverterConfig::default(),
    )
    .expect("build should succeed");

    let outcome = converter
        .convert(&json!({"user_id": "123", "user_name": "JohnDoe"}), None)
        .await
        .expect("conversion should succeed");

    assert_eq!(outcome.primary(), &json!({"id": "123", "name": "JohnDoe"}));
    assert_eq!(outcome.len(), 1);
}

#[tokio::test]
async fn test_later_field_wins_over_pre_hook_write() {
    let converter = build(
        |defs| {
            defs.pre_labeled(
                |_: &Value,
                 _: &Value,
                 target: &mut Value,
                 _: &mut Additions|
                 -> anyhow::Result<()> {
                    target["name"] = json!("from-hook");
                    Ok(())
                },
                "seed-name",
            );
            defs.field(
                "name",
                |_: &Value, _: &Value, target: &Value| -> anyhow::Result<Value> {
                    // The hook's write is visible to the field transform.
                    assert_eq!(target["name"], json!("from-hook"));
                    Ok(json!("from-field"))
                },
            )?;
            Ok(())
        },
        ConverterConfig::default(),
    )
    .unwrap();

    let outcome = converter.convert(&json!({}), None).await.unwrap();
    assert_eq!(outcome.primary()["name"], json!("from-field"));
}

#[tokio::test]
async fn test_post_hook_secondary_outputs_in_call_order() {
    let converter = build(
        |defs| {
            defs.field("id", helpers::copy("user_id"))?;
            defs.post_labeled(
                |_: &Value,
                 _: &Value,
                 _: &mut Value,
                 additions: &mut Additions|
                 -> anyhow::Result<()> {
                    additions.add(json!({"kind": "audit", "seq": 1}));
                    additions.add(json!({"kind": "metric", "seq": 2}));
                    Ok(())
                },
                "fanout",
            );
            Ok(())
        },
        ConverterConfig::default(),
    )
    .unwrap();

    let outcome = converter.convert(&json!({"user_id": "1"}), None).await.unwrap();
    assert_eq!(outcome.len(), 3);
    assert!(outcome.has_additional());
    assert_eq!(outcome.primary(), &json!({"id": "1"}));
    assert_eq!(
        outcome.additional(),
        &[
            json!({"kind": "audit", "seq": 1}),
            json!({"kind": "metric", "seq": 2})
        ]
    );
}

#[tokio::test]
async fn test_additional_outputs_are_pre_merged_with_defaults() {
    let converter = build(
        |defs| {
            defs.post(
                |_: &Value,
                 _: &Value,
                 _: &mut Value,
                 additions: &mut Additions|
                 -> anyhow::Result<()> {
                    additions.add(json!({"payload": true}));
                    Ok(())
                },
            );
            Ok(())
        },
        ConverterConfig::new().defaults(json!({"schema": "v1"})),
    )
    .unwrap();

    let outcome = converter.convert(&json!({}), None).await.unwrap();
    assert_eq!(
        outcome.additional(),
        &[json!({"schema": "v1", "payload": true})]
    );
}

#[tokio::test]
async fn test_idempotent_for_deterministic_pipelines() {
    let converter = build(
        |defs| {
            defs.field("id", helpers::copy("user_id"))?
                .field("email", helpers::lowercase("email"))?;
            defs.obj(|source: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
                Ok(json!({"extras": {"raw": source.clone()}}))
            });
            Ok(())
        },
        ConverterConfig::new().defaults(json!({"version": 3})),
    )
    .unwrap();

    let source = json!({"user_id": "u-1", "email": "A@B.COM"});
    let first = converter.convert(&source, None).await.unwrap();
    let second = converter.convert(&source, None).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_required_fields_missing_on_empty_source() {
    let converter = build(
        |_| Ok(()),
        ConverterConfig::new().required_fields(["id", "email"]),
    )
    .unwrap();

    let err = converter.convert(&json!({}), None).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(err
        .to_string()
        .ends_with("missing required fields: id, email"));
}

#[tokio::test]
async fn test_failing_field_throw_mode_rejects_with_field_name() {
    let converter = build(
        |defs| {
            defs.field(
                "amount",
                |_: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
                    anyhow::bail!("upstream unavailable")
                },
            )?;
            Ok(())
        },
        ConverterConfig::default(),
    )
    .unwrap();

    let err = converter.convert(&json!({}), None).await.unwrap_err();
    assert_eq!(err.field_name(), Some("amount"));
    assert!(matches!(err, Error::FieldConversion { .. }));
}

#[tokio::test]
async fn test_failing_field_warn_mode_logs_once_and_resolves() {
    let logger = Arc::new(RecordingLogger::default());
    let converter = build(
        |defs| {
            defs.field(
                "amount",
                |_: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
                    anyhow::bail!("upstream unavailable")
                },
            )?
            .field("id", helpers::copy("user_id"))?;
            Ok(())
        },
        ConverterConfig::new()
            .logger(logger.clone())
            .error_handling(ErrorMode::Warn),
    )
    .unwrap();

    let outcome = converter.convert(&json!({"user_id": "5"}), None).await.unwrap();
    assert!(outcome.primary().get("amount").is_none());
    assert_eq!(outcome.primary()["id"], json!("5"));

    let errors = logger.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("'amount'"));
}

#[tokio::test]
async fn test_failing_field_ignore_mode_stays_silent() {
    let logger = Arc::new(RecordingLogger::default());
    let converter = build(
        |defs| {
            defs.field(
                "amount",
                |_: &Value, _: &Value, _: &Value| -> anyhow::Result<Value> {
                    anyhow::bail!("upstream unavailable")
                },
            )?;
            Ok(())
        },
        ConverterConfig::new()
            .logger(logger.clone())
            .error_handling(ErrorMode::Ignore),
    )
    .unwrap();

    let outcome = converter.convert(&json!({}), None).await.unwrap();
    assert_eq!(outcome.primary(), &json!({}));
    assert!(logger.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failing_pre_hook_warn_mode_names_label() {
    let logger = Arc::new(RecordingLogger::default());
    let converter = build(
        |defs| {
            defs.pre_labeled(
                |_: &Value, _: &Value, _: &mut Value, _: &mut Additions| -> anyhow::Result<()> {
                    anyhow::bail!("hook exploded")
                },
                "enrich",
            );
            defs.field("id", helpers::copy("user_id"))?;
            Ok(())
        },
        ConverterConfig::new()
            .logger(logger.clone())
            .error_handling(ErrorMode::Warn),
    )
    .unwrap();

    let outcome = converter.convert(&json!({"user_id": "7"}), None).await.unwrap();
    assert_eq!(outcome.primary()["id"], json!("7"));
    let errors = logger.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("'enrich'"));
}

#[tokio::test]
async fn test_invalid_source_warn_mode_returns_defaults_and_logs() {
    let logger = Arc::new(RecordingLogger::default());
    let converter = build(
        |defs| {
            defs.field("id", helpers::copy("user_id"))?;
            Ok(())
        },
        ConverterConfig::new()
            .defaults(json!({"version": 1}))
            .logger(logger.clone())
            .error_handling(ErrorMode::Warn),
    )
    .unwrap();

    let outcome = converter.convert(&json!(42), None).await.unwrap();
    assert_eq!(outcome.primary(), &json!({"version": 1}));
    assert_eq!(logger.errors.lock().unwrap().len(), 1);
}

// Collision semantics for two field steps targeting the same name follow
// the merge strategy: scalars are overwritten, records merge recursively,
// sequences concatenate.

#[tokio::test]
async fn test_scalar_collision_last_writer_wins() {
    let converter = build(
        |defs| {
            defs.field("k", helpers::constant(json!("first")))?
                .field("k", helpers::constant(json!("second")))?;
            Ok(())
        },
        ConverterConfig::default(),
    )
    .unwrap();

    let outcome = converter.convert(&json!({}), None).await.unwrap();
    assert_eq!(outcome.primary()["k"], json!("second"));
}

#[tokio::test]
async fn test_record_collision_merges_recursively() {
    let converter = build(
        |defs| {
            defs.field("k", helpers::constant(json!({"a": 1, "nested": {"x": 1}})))?
                .field("k", helpers::constant(json!({"b": 2, "nested": {"y": 2}})))?;
            Ok(())
        },
        ConverterConfig::default(),
    )
    .unwrap();

    let outcome = converter.convert(&json!({}), None).await.unwrap();
    assert_eq!(
        outcome.primary()["k"],
        json!({"a": 1, "b": 2, "nested": {"x": 1, "y": 2}})
    );
}

#[tokio::test]
async fn test_sequence_collision_concatenates() {
    let converter = build(
        |defs| {
            defs.field("k", helpers::constant(json!([1, 2])))?
                .field("k", helpers::constant(json!([3])))?;
            Ok(())
        },
        ConverterConfig::default(),
    )
    .unwrap();

    let outcome = converter.convert(&json!({}), None).await.unwrap();
    assert_eq!(outcome.primary()["k"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_custom_merge_strategy_applies_at_every_merge_point() {
    // Replace-only strategy: no recursion, no concatenation.
    let converter = build(
        |defs| {
            defs.field("k", helpers::constant(json!([1, 2])))?
                .field("k", helpers::constant(json!([3])))?;
            Ok(())
        },
        ConverterConfig::new().merge_fn(remold::shallow_merge),
    )
    .unwrap();

    let outcome = converter.convert(&json!({}), None).await.unwrap();
    assert_eq!(outcome.primary()["k"], json!([3]));
}

// Asynchronous steps implement the step traits directly.

struct SlowEcho {
    key: &'static str,
    delay_ms: u64,
}

#[async_trait]
impl FieldTransform for SlowEcho {
    async fn apply(
        &self,
        source: &Value,
        _context: &Value,
        _target: &Value,
    ) -> anyhow::Result<Value> {
        tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        Ok(source[self.key].clone())
    }
}

#[tokio::test]
async fn test_async_steps_run_sequentially_in_registration_order() {
    let converter = build(
        |defs| {
            // The slow first step still completes before the second runs.
            defs.field("first", SlowEcho { key: "a", delay_ms: 20 })?
                .field(
                    "second",
                    |_: &Value, _: &Value, target: &Value| -> anyhow::Result<Value> {
                        Ok(target["first"].clone())
                    },
                )?;
            Ok(())
        },
        ConverterConfig::default(),
    )
    .unwrap();

    let outcome = converter.convert(&json!({"a": "slow"}), None).await.unwrap();
    assert_eq!(outcome.primary(), &json!({"first": "slow", "second": "slow"}));
}

#[tokio::test]
async fn test_outcome_accessors_are_uniform_across_shapes() {
    let single = Outcome::single(json!({"id": 1})).unwrap();
    let many = Outcome::many(json!({"id": 1}), vec![json!({"id": 2})]).unwrap();
    for outcome in [&single, &many] {
        assert!(!outcome.primary().is_null());
        assert_eq!(outcome.iter().count(), outcome.len());
    }
    assert!(Outcome::many(Value::Null, vec![json!({})]).is_err());
}
