mod endpoint;
mod failure;
mod matcher;
mod method;
mod recorder;
mod request;
mod responder;
mod response;
mod scenario;

pub use endpoint::Endpoint;
pub use failure::{Failure, FailureKind, FailureReporter};
pub use matcher::{match_headers, match_json_body, match_query_params, BoxedMatcher, Matcher};
pub use method::Method;
pub use recorder::ResponseRecorder;
pub use request::Request;
pub use responder::{
    headers, json_body, json_file_body, json_value_body, status_code, string_body,
    BoxedResponder, Responder,
};
pub use response::{Response, ResponseWriter};
pub use scenario::Scenario;
