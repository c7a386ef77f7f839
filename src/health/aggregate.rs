//! Fan-in of probe outcomes into one verdict.

use std::sync::atomic::Ordering;

use crate::health::probe::Dispatch;

/// Verdict of one health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    /// True iff no probe failed.
    pub healthy: bool,
    /// Probes that passed.
    pub probed: usize,
    /// Probes that failed; always `errors.len()`.
    pub failed: usize,
    /// Every supplied target, probed or not.
    pub total: usize,
    /// Failure details in completion order.
    pub errors: Vec<String>,
}

impl AggregateResult {
    /// Fold the counts left behind by a finished dispatch.
    pub fn new(attempted: usize, total: usize, errors: Vec<String>) -> Self {
        let failed = errors.len();
        Self {
            healthy: failed == 0,
            probed: attempted.saturating_sub(failed),
            failed,
            total,
            errors,
        }
    }
}

/// Drain every failure until the dispatcher closes the stream, then compute
/// the verdict. `total` is the number of targets supplied to the dispatch.
pub async fn collect(dispatch: Dispatch, total: usize) -> AggregateResult {
    let Dispatch {
        attempted,
        mut failures,
        barrier,
    } = dispatch;

    let mut errors = Vec::new();
    while let Some(detail) = failures.recv().await {
        errors.push(detail);
    }

    if let Err(e) = barrier.await {
        tracing::warn!(error = %e, "Health probe supervisor aborted");
    }

    AggregateResult::new(attempted.load(Ordering::SeqCst), total, errors)
}
