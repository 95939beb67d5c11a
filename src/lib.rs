//! Remold - declarative record-to-record conversion pipelines
//!
//! This crate converts a value of one record shape into a value (or several
//! related values) of another shape through a configured pipeline of
//! field-level and whole-object transformation steps, pre/post hooks, shared
//! context, and a configurable failure policy.
//!
//! # Main Components
//!
//! - **Error Handling**: Typed failure taxonomy using `thiserror`, with
//!   `anyhow` carrying the causes raised inside user-supplied steps
//! - **Merge Strategies**: Pluggable combining function applied at every
//!   merge point, defaulting to a recursive structural merge
//! - **Pipeline**: Registration, configuration, and the five-stage
//!   execution engine producing a single or multi-record [`Outcome`]
//! - **Logging**: Injected four-method sink, no-op by default
//!
//! # Example
//!
//! ```
//! use remold::{build, helpers, ConverterConfig, ErrorMode};
//! use serde_json::json;
//!
//! # fn main() -> remold::Result<()> {
//! let converter = build(
//!     |defs| {
//!         defs.field("id", helpers::copy("user_id"))?
//!             .field("name", helpers::copy("user_name"))?;
//!         Ok(())
//!     },
//!     ConverterConfig::new()
//!         .defaults(json!({"version": 1}))
//!         .error_handling(ErrorMode::Warn),
//! )?;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .build()
//!     .unwrap();
//! let outcome = runtime.block_on(
//!     converter.convert(&json!({"user_id": "123", "user_name": "JohnDoe"}), None),
//! )?;
//! assert_eq!(
//!     outcome.primary(),
//!     &json!({"version": 1, "id": "123", "name": "JohnDoe"})
//! );
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod helpers;
pub mod logging;
pub mod merge;
pub mod pipeline;

// Re-export main types for convenience
pub use error::{Error, ErrorMode, Result};
pub use logging::{Logger, NullLogger, StdLogger};
pub use merge::{deep_merge, shallow_merge, MergeStrategy};
pub use pipeline::{
    build, Additions, Bidirectional, Converter, ConverterConfig, DeferredMember,
    DeferredObjectTransform, DeferredRecord, Definitions, FieldOptions, FieldTransform, Hook,
    ObjectTransform, Outcome,
};

// Asynchronous steps implement the step traits with this attribute.
pub use async_trait::async_trait;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
