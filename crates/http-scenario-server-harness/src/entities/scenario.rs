use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BoxedMatcher, BoxedResponder, FailureReporter, Request, ResponseRecorder};

/// One mocked case of an endpoint
///
/// Holds the matchers validating requests, the responders building the
/// reply, how many calls are expected and how many were served.
pub struct Scenario {
    matchers: Vec<BoxedMatcher>,
    responders: Vec<BoxedResponder>,
    times: usize,
    calls: AtomicUsize,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("matchers", &self.matchers.len())
            .field("responders", &self.responders.len())
            .field("times", &self.times)
            .field("calls", &self.times_called())
            .finish()
    }
}

impl Scenario {
    pub fn new(matchers: impl IntoIterator<Item = BoxedMatcher>) -> Self {
        Self {
            matchers: matchers.into_iter().collect(),
            responders: Vec::new(),
            times: 1,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests this scenario is expected to serve. Must be at least 1.
    pub fn times(&mut self, n: usize) -> &mut Self {
        self.times = n;
        self
    }

    /// Replace the responders building this scenario's response
    pub fn respond(&mut self, responders: impl IntoIterator<Item = BoxedResponder>) -> &mut Self {
        self.responders = responders.into_iter().collect();
        self
    }

    pub fn expected_times(&self) -> usize {
        self.times
    }

    /// Count the call, then run every matcher against `request`
    pub fn matches(&self, request: &Request, reporter: &FailureReporter) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for matcher in &self.matchers {
            matcher.check(reporter, request);
        }
    }

    /// Apply every responder, in declaration order, to a fresh recorder
    pub fn render(&self) -> ResponseRecorder {
        let mut recorder = ResponseRecorder::new();
        for responder in &self.responders {
            responder.respond(&mut recorder);
        }
        recorder
    }

    pub fn times_called(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
