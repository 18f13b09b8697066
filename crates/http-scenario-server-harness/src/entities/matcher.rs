use assert_json_diff::{assert_json_matches_no_panic, CompareMode, Config};
use http::header::HeaderMap;
use std::collections::BTreeMap;

use super::{FailureReporter, Request};

/// A request validation step.
///
/// Implementations report problems through the [`FailureReporter`] and
/// return normally; the response is rendered whatever they find.
pub trait Matcher: Send + Sync {
    fn check(&self, reporter: &FailureReporter, request: &Request);
}

impl<F> Matcher for F
where
    F: Fn(&FailureReporter, &Request) + Send + Sync,
{
    fn check(&self, reporter: &FailureReporter, request: &Request) {
        self(reporter, request)
    }
}

/// Type alias for boxed matchers as stored by scenarios
pub type BoxedMatcher = Box<dyn Matcher>;

/// Require the query string to hold exactly these parameters.
///
/// Repeated keys are compared as ordered value lists.
pub fn match_query_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> BoxedMatcher
where
    K: Into<String>,
    V: Into<String>,
{
    let expected = group_pairs(params.into_iter().map(|(k, v)| (k.into(), v.into())));
    Box::new(move |reporter: &FailureReporter, request: &Request| {
        let actual = group_pairs(request.query_pairs());
        if actual != expected {
            reporter.mismatch(format!(
                "query parameters of {} {} do not match: expected {:?}, got {:?}",
                request.method, request.path, expected, actual
            ));
        }
    })
}

/// Require every header in `expected` to carry exactly the given values.
///
/// Headers not named in `expected` are ignored.
pub fn match_headers(expected: HeaderMap) -> BoxedMatcher {
    Box::new(move |reporter: &FailureReporter, request: &Request| {
        for name in expected.keys() {
            let want: Vec<_> = expected.get_all(name).iter().collect();
            let got: Vec<_> = request.headers.get_all(name).iter().collect();
            if want != got {
                reporter.mismatch(format!(
                    "header {} of {} {} does not match: expected {:?}, got {:?}",
                    name, request.method, request.path, want, got
                ));
            }
        }
    })
}

/// Require the request body to be JSON semantically equal to `json`
pub fn match_json_body(json: impl Into<String>) -> BoxedMatcher {
    let json = json.into();
    Box::new(move |reporter: &FailureReporter, request: &Request| {
        let expected: serde_json::Value = match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                reporter.mismatch(format!("expected JSON body is not valid JSON: {e}"));
                return;
            }
        };
        let actual: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(value) => value,
            Err(e) => {
                reporter.mismatch(format!(
                    "body of {} {} is not valid JSON: {e}",
                    request.method, request.path
                ));
                return;
            }
        };

        if let Err(diff) =
            assert_json_matches_no_panic(&actual, &expected, Config::new(CompareMode::Strict))
        {
            reporter.mismatch(format!(
                "JSON body of {} {} does not match:\n{diff}",
                request.method, request.path
            ));
        }
    })
}

fn group_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in pairs {
        grouped.entry(key).or_default().push(value);
    }
    grouped
}
