use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Request as AxumRequest,
    http::{Method as HttpMethod, StatusCode, Uri},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::entities::{Endpoint, FailureKind, FailureReporter, Method, Request, Response};
use crate::error::HarnessError;
use crate::use_cases::ports::{Server, ServerHandle};

/// Axum-based HTTP server implementation
#[derive(Debug, Clone)]
pub struct Axum {
    addr: SocketAddr,
}

impl Axum {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    pub fn bind(addr: impl Into<SocketAddr>) -> Self {
        Self::new(addr.into())
    }
}

impl Default for Axum {
    fn default() -> Self {
        Self::new(([127, 0, 0, 1], 0).into())
    }
}

fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Get => MethodFilter::GET,
        Method::Post => MethodFilter::POST,
        Method::Put => MethodFilter::PUT,
        Method::Patch => MethodFilter::PATCH,
        Method::Delete => MethodFilter::DELETE,
        Method::Head => MethodFilter::HEAD,
        Method::Options => MethodFilter::OPTIONS,
    }
}

async fn read_request(
    request: AxumRequest,
    fallback_method: Method,
    reporter: &FailureReporter,
) -> Request {
    let method = Method::from_http(request.method()).unwrap_or(fallback_method);
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let headers = request.headers().clone();

    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            reporter.report(
                FailureKind::Server,
                format!("failed to read body of {method} {path}: {e}"),
            );
            Vec::new()
        }
    };

    Request {
        method,
        path,
        query,
        headers,
        body,
    }
}

fn into_axum_response(response: Response, reporter: &FailureReporter) -> axum::response::Response {
    let status = match StatusCode::from_u16(response.status) {
        Ok(status) => status,
        Err(_) => {
            reporter.report(
                FailureKind::Server,
                format!("responder set invalid status code {}", response.status),
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let mut reply = axum::response::Response::new(Body::from(response.body));
    *reply.status_mut() = status;
    *reply.headers_mut() = response.headers;
    reply
}

async fn handle_request(
    endpoint: Arc<Endpoint>,
    reporter: FailureReporter,
    request: AxumRequest,
) -> axum::response::Response {
    let request = read_request(request, endpoint.method(), &reporter).await;
    let response = endpoint.handle(&request, &reporter);
    into_axum_response(response, &reporter)
}

fn unmatched(
    reporter: &FailureReporter,
    method: &HttpMethod,
    uri: &Uri,
    status: StatusCode,
) -> StatusCode {
    reporter.report(
        FailureKind::UnmatchedRoute,
        format!("no matching route found for {} {}", method, uri.path()),
    );
    status
}

fn build_router(endpoints: Vec<Arc<Endpoint>>, reporter: &FailureReporter) -> Router {
    // Endpoints sharing a path must live in one MethodRouter
    let mut paths: Vec<String> = Vec::new();
    let mut method_routers: HashMap<String, MethodRouter> = HashMap::new();
    let mut head_paths: HashSet<String> = HashSet::new();

    for endpoint in endpoints {
        let path = endpoint.path().to_string();
        if endpoint.method() == Method::Head {
            head_paths.insert(path.clone());
        }
        let filter = method_filter(endpoint.method());
        let handler = {
            let reporter = reporter.clone();
            move |request: AxumRequest| {
                handle_request(endpoint.clone(), reporter.clone(), request)
            }
        };

        let method_router = match method_routers.remove(&path) {
            Some(existing) => existing.on(filter, handler),
            None => {
                paths.push(path.clone());
                axum::routing::on(filter, handler)
            }
        };
        method_routers.insert(path, method_router);
    }

    let mut router = Router::new();
    for path in paths {
        let Some(mut method_router) = method_routers.remove(&path) else {
            continue;
        };
        let wrong_method = {
            let reporter = reporter.clone();
            move |method: HttpMethod, uri: Uri| async move {
                unmatched(&reporter, &method, &uri, StatusCode::METHOD_NOT_ALLOWED)
            }
        };
        // axum serves HEAD through the GET handler unless HEAD has its own route
        if !head_paths.contains(&path) {
            method_router = method_router.on(MethodFilter::HEAD, wrong_method.clone());
        }
        router = router.route(&path, method_router.fallback(wrong_method));
    }

    let not_found = {
        let reporter = reporter.clone();
        move |method: HttpMethod, uri: Uri| async move {
            unmatched(&reporter, &method, &uri, StatusCode::NOT_FOUND)
        }
    };
    router.fallback(not_found)
}

#[async_trait]
impl Server for Axum {
    async fn start(
        &self,
        endpoints: Vec<Arc<Endpoint>>,
        reporter: FailureReporter,
    ) -> Result<ServerHandle, HarnessError> {
        let router = build_router(endpoints, &reporter);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| HarnessError::ServerError(format!("failed to bind {}: {e}", self.addr)))?;

        let addr = listener
            .local_addr()
            .map_err(|e| HarnessError::ServerError(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .map_err(|e| HarnessError::ServerError(e.to_string()))
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task))
    }
}
