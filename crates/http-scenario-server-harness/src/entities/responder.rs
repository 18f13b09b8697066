use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::path::Path;

use super::ResponseRecorder;
use crate::error::HarnessError;

/// One response-construction step
pub trait Responder: Send + Sync {
    fn respond(&self, recorder: &mut ResponseRecorder);
}

impl<F> Responder for F
where
    F: Fn(&mut ResponseRecorder) + Send + Sync,
{
    fn respond(&self, recorder: &mut ResponseRecorder) {
        self(recorder)
    }
}

/// Type alias for boxed responders as stored by scenarios
pub type BoxedResponder = Box<dyn Responder>;

/// Respond with the given status code
pub fn status_code(status: u16) -> BoxedResponder {
    Box::new(move |recorder: &mut ResponseRecorder| recorder.write_status(status))
}

/// Add every header of `headers` to the response, keeping repeated values
pub fn headers(headers: HeaderMap) -> BoxedResponder {
    Box::new(move |recorder: &mut ResponseRecorder| {
        for (name, value) in headers.iter() {
            recorder.headers_mut().append(name.clone(), value.clone());
        }
    })
}

/// Respond with a JSON document given as text
pub fn json_body(json: impl Into<String>) -> BoxedResponder {
    let body = json.into().into_bytes();
    Box::new(move |recorder: &mut ResponseRecorder| {
        write_json(recorder, body.clone());
    })
}

/// Respond with a value serialized to JSON
pub fn json_value_body<T: serde::Serialize>(value: &T) -> Result<BoxedResponder, HarnessError> {
    let body = serde_json::to_vec(value)?;
    Ok(Box::new(move |recorder: &mut ResponseRecorder| {
        write_json(recorder, body.clone());
    }))
}

/// Respond with the contents of a JSON fixture file.
///
/// The file is read once, here, so a missing fixture fails the setup rather
/// than every request.
pub fn json_file_body(path: impl AsRef<Path>) -> Result<BoxedResponder, HarnessError> {
    let path = path.as_ref();
    let body = std::fs::read(path).map_err(|source| HarnessError::FixtureError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(move |recorder: &mut ResponseRecorder| {
        write_json(recorder, body.clone());
    }))
}

/// Respond with a plain text body
pub fn string_body(body: impl Into<String>) -> BoxedResponder {
    let body = body.into().into_bytes();
    Box::new(move |recorder: &mut ResponseRecorder| recorder.write(body.clone()))
}

fn write_json(recorder: &mut ResponseRecorder, body: Vec<u8>) {
    recorder
        .headers_mut()
        .append(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    recorder.write(body);
}
