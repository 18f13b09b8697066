use http::header::HeaderMap;

use super::ResponseWriter;

/// In-memory response sink shared by the responders of one request.
///
/// Headers accumulate. Status and body are last-write-wins, and a body write
/// replaces the previous one. Nothing reaches the client until [`flush`],
/// so responders can be declared in any order.
///
/// [`flush`]: ResponseRecorder::flush
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    headers: HeaderMap,
    status: Option<u16>,
    body: Vec<u8>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Record the status code, replacing any earlier one
    pub fn write_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    /// Record the full body, replacing any earlier one
    pub fn write(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Copy the recorded response into `target`.
    ///
    /// Order is fixed: headers, then the status if one was recorded, then
    /// the body if it is non-empty.
    pub fn flush<W: ResponseWriter + ?Sized>(self, target: &mut W) {
        let headers = target.headers_mut();
        let mut last_name = None;
        for (name, value) in self.headers {
            // HeaderMap yields `None` for repeated values of the same name
            if let Some(name) = name {
                last_name = Some(name);
            }
            if let Some(name) = &last_name {
                headers.append(name.clone(), value);
            }
        }

        if let Some(status) = self.status {
            target.write_status(status);
        }

        if !self.body.is_empty() {
            target.write_body(&self.body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Response;
    use http::header::{HeaderName, HeaderValue};

    fn x_foo() -> HeaderName {
        HeaderName::from_static("x-foo")
    }

    #[test]
    fn test_recorder_status_last_write_wins() {
        let mut recorder = ResponseRecorder::new();
        recorder.write_status(403);
        recorder.write_status(200);
        assert_eq!(recorder.status(), Some(200));
    }

    #[test]
    fn test_recorder_body_replaced_not_appended() {
        let mut recorder = ResponseRecorder::new();
        recorder.write("first");
        recorder.write("second");
        assert_eq!(recorder.body(), b"second");
    }

    #[test]
    fn test_recorder_flush_status_after_body() {
        let mut recorder = ResponseRecorder::new();
        recorder.write(r#"{"result": true}"#);
        recorder.write_status(201);

        let mut response = Response::new();
        recorder.flush(&mut response);

        assert_eq!(response.status, 201);
        assert_eq!(response.body, br#"{"result": true}"#);
    }

    #[test]
    fn test_recorder_order_independent() {
        let mut status_first = ResponseRecorder::new();
        status_first.write_status(201);
        status_first.write("body");

        let mut body_first = ResponseRecorder::new();
        body_first.write("body");
        body_first.write_status(201);

        let mut a = Response::new();
        let mut b = Response::new();
        status_first.flush(&mut a);
        body_first.flush(&mut b);

        assert_eq!(a.status, b.status);
        assert_eq!(a.body, b.body);
    }

    #[test]
    fn test_recorder_flush_keeps_repeated_headers() {
        let mut recorder = ResponseRecorder::new();
        recorder.headers_mut().append(x_foo(), HeaderValue::from_static("a"));
        recorder.headers_mut().append(x_foo(), HeaderValue::from_static("b"));

        let mut response = Response::new();
        recorder.flush(&mut response);

        let values: Vec<_> = response.headers.get_all("x-foo").iter().collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_recorder_flush_without_status_or_body() {
        let mut recorder = ResponseRecorder::new();
        recorder.headers_mut().append(x_foo(), HeaderValue::from_static("bar"));

        let mut response = Response::new();
        recorder.flush(&mut response);

        assert!(!response.is_committed());
        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
        assert_eq!(response.headers.get("x-foo").unwrap(), "bar");
    }
}
