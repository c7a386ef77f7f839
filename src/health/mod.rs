//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET .../health
//!     → TargetProvider snapshot
//!     → probe.rs (one task per probed target, bounded failure queue)
//!     → aggregate.rs (drain until closed, count)
//!     → response.rs (200 / 417 JSON body)
//! ```
//!
//! # Design Decisions
//! - Every check is computed from scratch; nothing is remembered between
//!   requests
//! - A failing probe only ever contributes a failure detail, it never aborts
//!   the check
//! - The only deadline is per probe; the check takes as long as its slowest
//!   probe

pub mod aggregate;
pub mod probe;
pub mod response;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::response::Response;

use crate::config::HealthCheckConfig;
use crate::discovery::TargetProvider;
use crate::observability::metrics;

pub use aggregate::AggregateResult;
pub use probe::{ProbeClient, ProbeOutcome};

/// Runs aggregate health checks against the targets of a provider.
#[derive(Clone)]
pub struct HealthChecker {
    targets: Arc<dyn TargetProvider>,
    client: ProbeClient,
    deadline: Duration,
    queue_capacity: usize,
}

impl HealthChecker {
    pub fn new(targets: Arc<dyn TargetProvider>, config: &HealthCheckConfig) -> Self {
        Self {
            targets,
            client: probe::probe_client(),
            deadline: Duration::from_millis(config.timeout_ms),
            queue_capacity: config.queue_capacity,
        }
    }

    /// Probe every target once and fold the outcomes into a verdict.
    pub async fn check(&self) -> AggregateResult {
        let started = Instant::now();
        let targets = self.targets.targets();

        let dispatch = probe::dispatch(&self.client, &targets, self.deadline, self.queue_capacity);
        let result = aggregate::collect(dispatch, targets.len()).await;

        metrics::record_check(result.healthy, started);
        tracing::debug!(
            healthy = result.healthy,
            probed = result.probed,
            failed = result.failed,
            total = result.total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Health check finished"
        );
        result
    }

    /// Run a check and encode it as the HTTP response.
    pub async fn respond(&self) -> Response {
        response::encode(&self.check().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{StaticTargets, TargetDescriptor};

    fn checker(targets: Vec<TargetDescriptor>) -> HealthChecker {
        HealthChecker::new(
            Arc::new(StaticTargets::new(targets)),
            &HealthCheckConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_empty_target_list_is_healthy() {
        let result = checker(vec![]).check().await;
        assert!(result.healthy);
        assert_eq!(result.probed, 0);
        assert_eq!(result.total, 0);
    }

    #[tokio::test]
    async fn test_unprobed_targets_count_toward_total_only() {
        let result = checker(vec![
            TargetDescriptor::unprobed("a"),
            TargetDescriptor::unprobed("b"),
            TargetDescriptor::unprobed("c"),
        ])
        .check()
        .await;
        assert!(result.healthy);
        assert_eq!(result.probed, 0);
        assert_eq!(result.total, 3);
    }
}
