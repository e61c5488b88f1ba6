//! Progress and outcome events surfaced to whoever runs the batch.
//!
//! The orchestrator never formats output itself; it hands short messages to a
//! [`Reporter`]. The binary uses [`TracingReporter`], tests use the mock or a
//! recording implementation.

#[allow(unused_imports)]
use mockall::automock;
use tracing::{error, info, warn};

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str, cause: &str);
}

/// Renders reporter events as `tracing` events under the `zipdrop::report` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!(target: "zipdrop::report", "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "zipdrop::report", "{message}");
    }

    fn error(&self, message: &str, cause: &str) {
        error!(target: "zipdrop::report", cause = %cause, "{message}");
    }
}
