//! Logging sink injected into a converter
//!
//! The pipeline never logs on its own; all diagnostics flow through this
//! four-method capability. The default sink discards everything, and
//! [`StdLogger`] bridges to the `log` facade for applications that already
//! have a logger installed.

use serde_json::Value;

/// Four-method diagnostics sink
///
/// `details` carries structured values related to the message, typically the
/// offending source value of a failed step.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, details: &[Value]);
    fn info(&self, message: &str, details: &[Value]);
    fn warn(&self, message: &str, details: &[Value]);
    fn error(&self, message: &str, details: &[Value]);
}

/// Default sink: every method discards its arguments
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str, _details: &[Value]) {}
    fn info(&self, _message: &str, _details: &[Value]) {}
    fn warn(&self, _message: &str, _details: &[Value]) {}
    fn error(&self, _message: &str, _details: &[Value]) {}
}

/// Sink that forwards to the `log` facade at matching levels
#[derive(Debug, Default, Clone, Copy)]
pub struct StdLogger;

impl StdLogger {
    fn format(message: &str, details: &[Value]) -> String {
        if details.is_empty() {
            message.to_string()
        } else {
            format!("{} {:?}", message, details)
        }
    }
}

impl Logger for StdLogger {
    fn debug(&self, message: &str, details: &[Value]) {
        log::debug!("{}", Self::format(message, details));
    }

    fn info(&self, message: &str, details: &[Value]) {
        log::info!("{}", Self::format(message, details));
    }

    fn warn(&self, message: &str, details: &[Value]) {
        log::warn!("{}", Self::format(message, details));
    }

    fn error(&self, message: &str, details: &[Value]) {
        log::error!("{}", Self::format(message, details));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_with_and_without_details() {
        assert_eq!(StdLogger::format("msg", &[]), "msg");
        let formatted = StdLogger::format("msg", &[json!(1)]);
        assert!(formatted.starts_with("msg "));
        assert!(formatted.contains('1'));
    }

    #[test]
    fn test_null_logger_is_callable() {
        // Just exercises the no-op paths
        NullLogger.debug("a", &[]);
        NullLogger.info("b", &[json!(null)]);
        NullLogger.warn("c", &[]);
        NullLogger.error("d", &[]);
    }
}
