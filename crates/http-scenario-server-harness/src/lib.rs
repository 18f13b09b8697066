//! HTTP Scenario Server Harness
//!
//! A programmable HTTP test double. Declare endpoints with one or more
//! scenarios, each with request matchers, response builders and an expected
//! number of calls. The server plays the scenarios back in order and, at the
//! end of the test, checks that every scenario was called as often as
//! expected.
//!
//! # Example
//!
//! ```rust,no_run
//! use http_scenario_server_harness::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), HarnessError> {
//!     let mut builder = MockServer::builder();
//!
//!     // The first two calls are rejected, every later one succeeds
//!     builder.get("/isbn", []).times(2).respond([status_code(403)]);
//!     builder
//!         .get("/isbn", [])
//!         .respond([status_code(200), json_body(r#"{"isbn": "978-3-16"}"#)]);
//!
//!     // Matchers report mismatches without stopping the response
//!     builder
//!         .post("/books", [match_json_body(r#"{"title": "Dune"}"#)])
//!         .respond([status_code(201)]);
//!
//!     let mut server = builder.start().await?;
//!
//!     let client = reqwest::Client::new();
//!     for _ in 0..3 {
//!         let _ = client.get(server.url_for("/isbn")).send().await;
//!     }
//!     let _ = client
//!         .post(server.url_for("/books"))
//!         .json(&json!({"title": "Dune"}))
//!         .send()
//!         .await;
//!
//!     // Stops the listener and panics if any expectation was not met
//!     server.assert_expectations().await;
//!     Ok(())
//! }
//! ```

mod adapters;
pub mod entities;
pub mod error;
pub mod use_cases;

pub use error::HarnessError;

#[cfg(feature = "axum")]
pub use adapters::gateways::Axum;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::{
        headers, json_body, json_file_body, json_value_body, match_headers, match_json_body,
        match_query_params, status_code, string_body, BoxedMatcher, BoxedResponder, Failure,
        FailureKind, FailureReporter, Matcher, Method, Request, Responder, ResponseRecorder,
        Scenario,
    };
    pub use crate::error::HarnessError;
    pub use crate::use_cases::ports::Server;
    pub use crate::use_cases::{MockServer, MockServerBuilder};

    #[cfg(feature = "axum")]
    pub use crate::Axum;

    pub use serde_json::json;
}
