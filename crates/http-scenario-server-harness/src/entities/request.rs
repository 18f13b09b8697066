use http::header::{HeaderMap, HeaderName, HeaderValue};

/// An HTTP request received by the harness, as seen by matchers
#[derive(Debug, Clone)]
pub struct Request {
    pub method: super::Method,
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: super::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Append a header value; repeated names keep every value
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn body_as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Decoded query parameters in the order they appear
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match &self.query {
            Some(query) => form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Method;

    #[test]
    fn test_request_body_as_str() {
        let request = Request::new(Method::Post, "/test").with_body("Hello World");
        assert_eq!(request.body_as_str(), Some("Hello World"));
    }

    #[test]
    fn test_request_body_as_str_invalid_utf8() {
        let request = Request::new(Method::Post, "/test").with_body(vec![0xFF, 0xFE]);
        assert_eq!(request.body_as_str(), None);
    }

    #[test]
    fn test_request_query_pairs_decoded() {
        let request = Request::new(Method::Get, "/search").with_query("q=rust%20lang&tag=a&tag=b");
        assert_eq!(
            request.query_pairs(),
            vec![
                ("q".to_string(), "rust lang".to_string()),
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_without_query() {
        let request = Request::new(Method::Get, "/search");
        assert!(request.query_pairs().is_empty());
    }

    #[test]
    fn test_request_repeated_headers() {
        let request = Request::new(Method::Get, "/")
            .with_header(HeaderName::from_static("accept"), HeaderValue::from_static("a/b"))
            .with_header(HeaderName::from_static("accept"), HeaderValue::from_static("c/d"));
        assert_eq!(request.headers.get_all("accept").iter().count(), 2);
    }
}
