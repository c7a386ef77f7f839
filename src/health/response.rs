//! Health response encoding.
//!
//! ```text
//! 200 {"status": "ok", "services": <probed>}
//! 417 {"status": "failed", "passed": <probed>, "failed":<total-probed>, "errors": "[<detail> <detail>]"}
//! ```
//!
//! The byte layout is fixed for existing consumers. `errors` is a JSON
//! string holding the bracketed list, escaped so the body always parses.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::body::{Body as HttpBody, Frame, SizeHint};

use crate::health::aggregate::AggregateResult;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

/// Render failure details as `[a b c]`.
pub fn render_errors(errors: &[String]) -> String {
    format!("[{}]", errors.join(" "))
}

/// Body text for a finished check.
pub fn render_body(result: &AggregateResult) -> String {
    if result.healthy {
        return format!(r#"{{"status": "ok", "services": {}}}"#, result.probed);
    }

    let errors = match serde_json::to_string(&render_errors(&result.errors)) {
        Ok(quoted) => quoted,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to render health errors");
            r#""[]""#.to_string()
        }
    };
    format!(
        r#"{{"status": "failed", "passed": {}, "failed":{}, "errors": {}}}"#,
        result.probed,
        result.total.saturating_sub(result.probed),
        errors
    )
}

/// Build the single response for a finished check.
pub fn encode(result: &AggregateResult) -> Response {
    let status = if result.healthy {
        StatusCode::OK
    } else {
        StatusCode::EXPECTATION_FAILED
    };

    (
        status,
        [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
        Body::new(ReportedBody::new(render_body(result).into())),
    )
        .into_response()
}

/// Single-chunk body with an exact length that logs a warning when it is
/// dropped before the connection took the chunk, i.e. the client went away.
struct ReportedBody {
    chunk: Option<Bytes>,
}

impl ReportedBody {
    fn new(chunk: Bytes) -> Self {
        Self { chunk: Some(chunk) }
    }
}

impl HttpBody for ReportedBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
        Poll::Ready(self.chunk.take().map(|chunk| Ok(Frame::data(chunk))))
    }

    fn is_end_stream(&self) -> bool {
        self.chunk.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.chunk.as_ref().map_or(0, |c| c.len() as u64))
    }
}

impl Drop for ReportedBody {
    fn drop(&mut self) {
        if self.chunk.is_some() {
            tracing::warn!("Failed to send health response, client disconnected");
        }
    }
}
