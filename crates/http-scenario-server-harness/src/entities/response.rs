use http::header::HeaderMap;

/// Destination of a flushed [`ResponseRecorder`](super::ResponseRecorder).
///
/// Mirrors a live HTTP response writer: headers can be edited until the
/// status is committed, and writing a body commits the status.
pub trait ResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap;
    fn write_status(&mut self, status: u16);
    fn write_body(&mut self, body: &[u8]);
}

/// An HTTP response as sent back by the harness
///
/// Behaves like a one-shot writer: the first status write wins, and a body
/// write without a prior status commits `200`.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    committed: bool,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            body: Vec::new(),
            committed: false,
        }
    }

    /// Whether the status line has been fixed
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter for Response {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: u16) {
        if self.committed {
            tracing::debug!(status, kept = self.status, "status already committed, ignoring");
            return;
        }
        self.status = status;
        self.committed = true;
    }

    fn write_body(&mut self, body: &[u8]) {
        if !self.committed {
            self.committed = true;
        }
        self.body.extend_from_slice(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, CONTENT_TYPE};

    #[test]
    fn test_response_new() {
        let response = Response::new();
        assert_eq!(response.status, 200);
        assert!(response.headers.is_empty());
        assert!(response.body.is_empty());
        assert!(!response.is_committed());
    }

    #[test]
    fn test_response_first_status_wins() {
        let mut response = Response::new();
        response.write_status(201);
        response.write_status(404);
        assert_eq!(response.status, 201);
    }

    #[test]
    fn test_response_body_commits_ok() {
        let mut response = Response::new();
        response.write_body(b"{}");
        response.write_status(201);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"{}");
    }

    #[test]
    fn test_response_body_writes_append() {
        let mut response = Response::new();
        response.write_body(b"Hello, ");
        response.write_body(b"World");
        assert_eq!(response.body, b"Hello, World");
    }

    #[test]
    fn test_response_headers_mut() {
        let mut response = Response::new();
        response
            .headers_mut()
            .append(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }
}
