//! Probe dispatch.
//!
//! # Responsibilities
//! - Fan out one task per target that has a probe URL
//! - Classify each probe: exactly 200 within the deadline passes, anything
//!   else fails with a detail naming the URL and the cause
//! - Hand failures to the aggregator over a bounded queue
//!
//! # Design Decisions
//! - Probes live in a `JoinSet`; a supervisor task joins them all and then
//!   drops the last sender, which is what ends the aggregator's stream
//! - A panicking probe is reported as a failure by the supervisor, so the
//!   attempted counter and the failure tally never disagree
//! - No retries: one GET per target per check

use std::error::Error as StdError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time;

use crate::discovery::TargetDescriptor;
use crate::observability::metrics;

/// HTTP client shared by every probe.
pub type ProbeClient = Client<HttpConnector, Body>;

pub fn probe_client() -> ProbeClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Result of probing one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Passed,
    /// `"<url>, <cause>"`
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ProbeOutcome::Passed)
    }
}

/// Probes in flight for one health check.
pub struct Dispatch {
    /// Probes started so far; final once `failures` is closed.
    pub(crate) attempted: Arc<AtomicUsize>,
    /// Failure details, in completion order.
    pub(crate) failures: mpsc::Receiver<String>,
    /// Supervisor joining every probe task.
    pub(crate) barrier: JoinHandle<()>,
}

/// Issue a single GET against `url` and classify the response.
pub async fn probe(client: &ProbeClient, url: &str, deadline: Duration) -> ProbeOutcome {
    let request = match Request::builder()
        .method(Method::GET)
        .uri(url)
        .header(header::USER_AGENT, "health-probe")
        .body(Body::empty())
    {
        Ok(req) => req,
        Err(e) => return failed(url, format!("invalid probe url: {}", e)),
    };

    match time::timeout(deadline, client.request(request)).await {
        Ok(Ok(response)) if response.status() == StatusCode::OK => {
            metrics::record_probe(true);
            ProbeOutcome::Passed
        }
        Ok(Ok(response)) => failed(url, response.status().to_string()),
        Ok(Err(e)) => failed(url, describe(&e)),
        Err(_) => failed(url, format!("timed out after {}ms", deadline.as_millis())),
    }
}

fn failed(url: &str, cause: String) -> ProbeOutcome {
    tracing::warn!(url = %url, cause = %cause, "Health probe failed");
    metrics::record_probe(false);
    ProbeOutcome::Failed(format!("{}, {}", url, cause))
}

// hyper's top-level errors are terse; the useful part is in the source chain.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Start one probe per target with a non-empty probe URL.
///
/// Targets without a probe URL are skipped entirely. Must be called from
/// within a Tokio runtime.
pub fn dispatch(
    client: &ProbeClient,
    targets: &[TargetDescriptor],
    deadline: Duration,
    queue_capacity: usize,
) -> Dispatch {
    let (tx, failures) = mpsc::channel(queue_capacity.max(1));
    let attempted = Arc::new(AtomicUsize::new(0));
    let mut probes = JoinSet::new();

    for target in targets.iter().filter(|t| t.is_probed()) {
        let client = client.clone();
        let url = target.probe_url.clone();
        let tx = tx.clone();
        let attempted = attempted.clone();

        probes.spawn(async move {
            attempted.fetch_add(1, Ordering::SeqCst);
            if let ProbeOutcome::Failed(detail) = probe(&client, &url, deadline).await {
                let _ = tx.send(detail).await;
            }
        });
    }

    tracing::debug!(
        total = targets.len(),
        probed = probes.len(),
        "Health probes dispatched"
    );

    let barrier = tokio::spawn(supervise(probes, tx));

    Dispatch {
        attempted,
        failures,
        barrier,
    }
}

/// Join every probe task, report the ones that died as failures, then drop
/// the last sender so the failure stream closes.
pub(crate) async fn supervise(mut probes: JoinSet<()>, tx: mpsc::Sender<String>) {
    while let Some(joined) = probes.join_next().await {
        if let Err(e) = joined {
            tracing::warn!(error = %e, "Health probe task aborted");
            let _ = tx.send(format!("probe task aborted, {}", e)).await;
        }
    }
}
