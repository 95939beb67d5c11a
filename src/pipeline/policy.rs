//! Failure policy dispatch for run-time errors inside pipeline steps
//!
//! Every internally-caught failure is classified into one [`Error`] kind by
//! the stage that caught it, then routed here. `Throw` raises, `Warn` emits
//! through the logging sink at error severity and continues, `Ignore`
//! continues without touching the sink. The mode is fixed for the
//! converter's lifetime; there is no per-stage override.
//!
//! Copyright (c) 2026 Remold Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, ErrorMode, Result};
use crate::logging::Logger;
use std::sync::Arc;

pub(crate) struct ErrorPolicy {
    mode: ErrorMode,
    logger: Arc<dyn Logger>,
}

impl ErrorPolicy {
    pub(crate) fn new(mode: ErrorMode, logger: Arc<dyn Logger>) -> Self {
        Self { mode, logger }
    }

    /// Route one classified failure according to the configured mode
    ///
    /// Returns `Err` only under `Throw`; an `Ok(())` means the failing
    /// step's contribution is simply absent and the pipeline continues.
    pub(crate) fn dispatch(&self, error: Error) -> Result<()> {
        match self.mode {
            ErrorMode::Throw => Err(error),
            ErrorMode::Warn => {
                self.logger.error(&error.to_string(), &error.detail_values());
                Ok(())
            }
            ErrorMode::Ignore => Ok(()),
        }
    }
}
