//! Simple example demonstrating basic usage of http-scenario-server-harness
//!
//! This example shows how to:
//! - Declare several scenarios for one endpoint and have them played in order
//! - Validate incoming requests with matchers
//! - Verify at the end that every scenario was called the expected number of times

use http_scenario_server_harness::prelude::*;

#[tokio::main]
async fn main() -> Result<(), HarnessError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut builder = MockServer::builder();

    // The token endpoint refuses the first call, then hands out a token
    builder
        .post("/api/auth/token", [])
        .respond([status_code(401), json_body(r#"{"error": "try again"}"#)]);
    let token = json_value_body(&json!({
        "access_token": "abc123",
        "token_type": "Bearer",
        "expires_in": 3600
    }))?;
    builder.post("/api/auth/token", []).respond([token]);

    // The greet endpoint expects a JSON payload
    builder
        .post("/api/greet", [match_json_body(r#"{"name": "World"}"#)])
        .respond([status_code(200), string_body("Hello, World!")]);

    let mut server = builder.start().await?;
    println!("Mock server listening at {}\n", server.url());

    let client = reqwest::Client::new();

    for attempt in 1..=2 {
        let resp = client
            .post(server.url_for("/api/auth/token"))
            .send()
            .await
            .expect("Request failed");
        println!("Token attempt {}: {}", attempt, resp.status());
    }

    let resp = client
        .post(server.url_for("/api/greet"))
        .json(&json!({"name": "World"}))
        .send()
        .await
        .expect("Request failed");
    println!("Greet: {}", resp.text().await.expect("Failed to read body"));

    let failures = server.verify().await;
    println!("\n=== Verification ===");
    if failures.is_empty() {
        println!("All expectations met");
    }
    for failure in &failures {
        println!("  - {}", failure);
    }

    Ok(())
}
