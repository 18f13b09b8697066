use std::sync::{Arc, Mutex};

/// Category of a recorded test failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A matcher rejected the request it was given
    Mismatch,
    /// No endpoint is registered for the request's method and path
    UnmatchedRoute,
    /// A scenario was not called the expected number of times
    CallCount,
    /// The listener failed while serving or shutting down
    Server,
}

/// A single non-fatal failure recorded while a mock server was running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Shared, accumulating failure channel.
///
/// Matchers, the router fallbacks and the verification sweep all report here.
/// Reporting never interrupts the caller, so one run surfaces every violation
/// instead of stopping at the first. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct FailureReporter {
    failures: Arc<Mutex<Vec<Failure>>>,
}

impl FailureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure of the given kind
    pub fn report(&self, kind: FailureKind, message: impl Into<String>) {
        let failure = Failure::new(kind, message);
        tracing::warn!(kind = ?failure.kind, "{}", failure.message);
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(failure);
        }
    }

    /// Record a request mismatch; the usual entry point for matchers
    pub fn mismatch(&self, message: impl Into<String>) {
        self.report(FailureKind::Mismatch, message);
    }

    /// Copy of every failure recorded so far, in report order
    pub fn failures(&self) -> Vec<Failure> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.failures.lock().map(|failures| failures.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_accumulates_in_order() {
        let reporter = FailureReporter::new();
        reporter.mismatch("first");
        reporter.report(FailureKind::CallCount, "second");

        let failures = reporter.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0], Failure::new(FailureKind::Mismatch, "first"));
        assert_eq!(failures[1].kind, FailureKind::CallCount);
    }

    #[test]
    fn test_reporter_clones_share_storage() {
        let reporter = FailureReporter::new();
        let clone = reporter.clone();
        clone.mismatch("from clone");
        assert_eq!(reporter.len(), 1);
        assert!(!reporter.is_empty());
    }

    #[test]
    fn test_failure_display_is_message() {
        let failure = Failure::new(FailureKind::UnmatchedRoute, "no route");
        assert_eq!(failure.to_string(), "no route");
    }
}
