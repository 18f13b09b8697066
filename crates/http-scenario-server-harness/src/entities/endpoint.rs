use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    BoxedMatcher, Failure, FailureKind, FailureReporter, Method, Request, Response,
    ResponseWriter, Scenario,
};

/// An HTTP method and path serving an ordered list of scenarios.
///
/// Scenarios are appended while registering. [`freeze`](Endpoint::freeze)
/// computes the response plan: each scenario's index repeated as many times
/// as it is expected to be called, in registration order. Request `n` is
/// served by `plan[min(n, plan.len() - 1)]`, so calls past the plan keep
/// hitting the last scenario.
#[derive(Debug)]
pub struct Endpoint {
    method: Method,
    path: String,
    scenarios: Vec<Scenario>,
    plan: Vec<usize>,
    requests: AtomicUsize,
}

impl Endpoint {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            scenarios: Vec::new(),
            plan: Vec::new(),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `METHOD /path`, as used in failure messages
    pub fn name(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Append a new scenario and return it for configuration
    pub fn add_scenario(
        &mut self,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        let index = self.scenarios.len();
        self.scenarios.push(Scenario::new(matchers));
        &mut self.scenarios[index]
    }

    /// Build the response plan. Called once, when the server starts.
    pub fn freeze(&mut self) {
        self.plan = self
            .scenarios
            .iter()
            .enumerate()
            .flat_map(|(index, scenario)| std::iter::repeat(index).take(scenario.expected_times()))
            .collect();
    }

    pub fn plan(&self) -> &[usize] {
        &self.plan
    }

    /// Index of the scenario serving request number `n`
    fn scenario_index(&self, n: usize) -> Option<usize> {
        let last = self.plan.len().checked_sub(1)?;
        self.plan.get(n.min(last)).copied()
    }

    /// Serve one request through the scenario the plan assigns to it
    pub fn handle(&self, request: &Request, reporter: &FailureReporter) -> Response {
        let n = self.requests.fetch_add(1, Ordering::SeqCst);
        let mut response = Response::new();

        let Some(index) = self.scenario_index(n) else {
            reporter.report(
                FailureKind::Server,
                format!("endpoint {} has no scenario to serve request {n}", self.name()),
            );
            response.write_status(500);
            return response;
        };

        tracing::debug!(
            endpoint = %self.name(),
            request = n,
            scenario = index,
            "dispatching request"
        );

        let scenario = &self.scenarios[index];
        scenario.matches(request, reporter);
        scenario.render().flush(&mut response);
        response
    }

    /// Total number of requests this endpoint received
    pub fn times_called(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Compare every scenario's call count with its expectation.
    ///
    /// Returns one failure per scenario whose count differs.
    pub fn verify(&self) -> Vec<Failure> {
        let multiple = self.scenarios.len() > 1;
        self.scenarios
            .iter()
            .enumerate()
            .filter_map(|(index, scenario)| {
                let called = scenario.times_called();
                let expected = scenario.expected_times();
                let name = if multiple {
                    format!("{} (scenario {})", self.name(), index + 1)
                } else {
                    self.name()
                };

                if called == expected {
                    None
                } else if called == 0 {
                    Some(Failure::new(
                        FailureKind::CallCount,
                        format!("expected endpoint was not called: {name}"),
                    ))
                } else {
                    Some(Failure::new(
                        FailureKind::CallCount,
                        format!("endpoint {name} was called {called} times, expected {expected}"),
                    ))
                }
            })
            .collect()
    }
}
