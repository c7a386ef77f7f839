//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the probe.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::discovery::TargetDescriptor;

/// Root configuration for the health probe.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream targets, in the order they are reported.
    pub targets: Vec<TargetConfig>,

    /// Probe settings.
    pub health_check: HealthCheckConfig,

    /// Timeout configuration for the HTTP surface.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProbeConfig {
    /// Targets as descriptors, in configuration order.
    pub fn target_descriptors(&self) -> Vec<TargetDescriptor> {
        self.targets.iter().map(TargetDescriptor::from).collect()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// One upstream target.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TargetConfig {
    /// Target identifier for logging.
    #[serde(default)]
    pub name: String,

    /// URL probed with GET. Leave empty to count the target without probing it.
    #[serde(default)]
    pub probe_url: String,
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Per-probe deadline in milliseconds.
    pub timeout_ms: u64,

    /// Capacity of the queue carrying probe failures to the aggregator.
    pub queue_capacity: usize,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 100,
            queue_capacity: 8,
        }
    }
}

/// Timeout configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter, overridden by `RUST_LOG`.
    pub log_filter: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Address the Prometheus exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "health_probe=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ProbeConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.health_check.timeout_ms, 100);
        assert_eq!(config.health_check.queue_capacity, 8);
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_targets_keep_order_and_empty_urls() {
        let config: ProbeConfig = toml::from_str(
            r#"
            [[targets]]
            name = "static-site"

            [[targets]]
            name = "api"
            probe_url = "http://127.0.0.1:3000/ping"
            "#,
        )
        .unwrap();

        let descriptors = config.target_descriptors();
        assert_eq!(descriptors.len(), 2);
        assert!(!descriptors[0].is_probed());
        assert_eq!(descriptors[1].probe_url, "http://127.0.0.1:3000/ping");
    }
}
