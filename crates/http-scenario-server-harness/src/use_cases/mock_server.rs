use std::net::SocketAddr;
use std::sync::Arc;

use crate::entities::{
    BoxedMatcher, Endpoint, Failure, FailureKind, FailureReporter, Method, Scenario,
};
use crate::error::HarnessError;
use crate::use_cases::ports::{Server, ServerHandle};
use crate::use_cases::Registry;

/// Builder declaring the endpoints of a mock server before it starts
///
/// # Example
///
/// ```rust,no_run
/// use http_scenario_server_harness::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), HarnessError> {
///     let mut builder = MockServer::builder();
///     builder.get("/isbn", []).times(2).respond([status_code(403)]);
///     builder.get("/isbn", []).respond([status_code(200), json_body(r#"{"ok": true}"#)]);
///
///     let mut server = builder.start().await?;
///
///     #[cfg(feature = "doctest")]
///     {
///         let client = reqwest::Client::new();
///         for _ in 0..3 {
///             client.get(server.url_for("/isbn")).send().await.unwrap();
///         }
///     }
///
///     server.assert_expectations().await;
///     Ok(())
/// }
/// ```
pub struct MockServerBuilder<S> {
    server: S,
    registry: Registry,
}

impl<S> MockServerBuilder<S> {
    /// Create a builder serving through `server`
    pub fn new(server: S) -> Self {
        Self {
            server,
            registry: Registry::new(),
        }
    }

    /// Set the server implementation to use
    pub fn server<NewS: Server>(self, server: NewS) -> MockServerBuilder<NewS> {
        MockServerBuilder {
            server,
            registry: self.registry,
        }
    }

    /// Declare a scenario for `method` and `path`.
    ///
    /// Scenarios declared for the same method and path share one endpoint
    /// and are served in declaration order.
    pub fn endpoint(
        &mut self,
        method: Method,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.registry.register(method, path, matchers)
    }

    pub fn get(
        &mut self,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.endpoint(Method::Get, path, matchers)
    }

    pub fn post(
        &mut self,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.endpoint(Method::Post, path, matchers)
    }

    pub fn put(
        &mut self,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.endpoint(Method::Put, path, matchers)
    }

    pub fn patch(
        &mut self,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.endpoint(Method::Patch, path, matchers)
    }

    pub fn delete(
        &mut self,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.endpoint(Method::Delete, path, matchers)
    }

    pub fn head(
        &mut self,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.endpoint(Method::Head, path, matchers)
    }

    pub fn options(
        &mut self,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        self.endpoint(Method::Options, path, matchers)
    }
}

#[cfg(feature = "axum")]
impl MockServerBuilder<crate::Axum> {
    /// Listen on a fixed local port instead of any free one
    pub fn port(mut self, port: u16) -> Self {
        self.server = crate::Axum::bind(([127, 0, 0, 1], port));
        self
    }
}

impl<S: Server> MockServerBuilder<S> {
    /// Freeze every endpoint's response plan and start listening.
    ///
    /// All endpoints must be declared before this call.
    pub async fn start(self) -> Result<MockServer, HarnessError> {
        let endpoints = self.registry.freeze()?;
        let reporter = FailureReporter::new();

        let handle = self.server.start(endpoints.clone(), reporter.clone()).await?;
        tracing::info!(addr = %handle.addr(), endpoints = endpoints.len(), "mock server listening");

        Ok(MockServer {
            endpoints,
            reporter,
            handle,
            verified: false,
        })
    }
}

/// A running mock server.
///
/// Dropping it stops the listener; call [`assert_expectations`] at the end of
/// a test to also check every scenario's call count.
///
/// [`assert_expectations`]: MockServer::assert_expectations
#[derive(Debug)]
pub struct MockServer {
    endpoints: Vec<Arc<Endpoint>>,
    reporter: FailureReporter,
    handle: ServerHandle,
    verified: bool,
}

impl MockServer {
    /// Builder listening on any free local port
    #[cfg(feature = "axum")]
    pub fn builder() -> MockServerBuilder<crate::Axum> {
        MockServerBuilder::new(crate::Axum::default())
    }

    pub fn addr(&self) -> SocketAddr {
        self.handle.addr()
    }

    pub fn port(&self) -> u16 {
        self.handle.addr().port()
    }

    /// Base URL, e.g. `http://127.0.0.1:40123`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr())
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }

    /// The failure channel shared with matchers and the router
    pub fn reporter(&self) -> &FailureReporter {
        &self.reporter
    }

    /// Every failure recorded so far
    pub fn failures(&self) -> Vec<Failure> {
        self.reporter.failures()
    }

    fn find(&self, method: Method, path: &str) -> Option<&Arc<Endpoint>> {
        self.endpoints
            .iter()
            .find(|e| e.method() == method && e.path() == path)
    }

    /// Requests served by the endpoint, or `None` if it was never declared
    pub fn times_called(&self, method: Method, path: &str) -> Option<usize> {
        self.find(method, path).map(|e| e.times_called())
    }

    /// Record a failure if the endpoint was called or was never declared
    pub fn assert_not_called(&self, method: Method, path: &str) {
        match self.find(method, path) {
            None => self.reporter.report(
                FailureKind::CallCount,
                format!("unknown endpoint: {method} {path}"),
            ),
            Some(endpoint) if endpoint.times_called() > 0 => self.reporter.report(
                FailureKind::CallCount,
                format!("endpoint was called when not expected: {}", endpoint.name()),
            ),
            Some(_) => {}
        }
    }

    /// Stop accepting requests and release the listener. Safe to call twice.
    pub async fn teardown(&mut self) -> Result<(), HarnessError> {
        self.handle.shutdown().await
    }

    /// Stop the listener, then compare every scenario's call count with
    /// its expectation.
    ///
    /// Returns every failure recorded during the run, including matcher and
    /// routing failures. Call-count failures are only added once.
    pub async fn verify(&mut self) -> Vec<Failure> {
        if let Err(e) = self.teardown().await {
            self.reporter.report(FailureKind::Server, e.to_string());
        }

        if !self.verified {
            self.verified = true;
            for endpoint in &self.endpoints {
                for failure in endpoint.verify() {
                    self.reporter.report(failure.kind, failure.message);
                }
            }
        }

        self.reporter.failures()
    }

    /// Verify, tear down, and panic listing every failure if there is any
    pub async fn assert_expectations(&mut self) {
        let failures = self.verify().await;
        if !failures.is_empty() {
            let listing: Vec<String> = failures.iter().map(|f| format!("  - {f}")).collect();
            panic!(
                "mock server at {} recorded {} failure(s):\n{}",
                self.addr(),
                failures.len(),
                listing.join("\n")
            );
        }
    }
}
