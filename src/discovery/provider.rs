//! Target providers.
//!
//! # Responsibilities
//! - Expose the current ordered target list to the health checker
//! - Swap the list atomically when configuration is reloaded

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;

use crate::config::ProbeConfig;
use crate::discovery::TargetDescriptor;

/// Read-only source of targets, consulted once per health check.
pub trait TargetProvider: Send + Sync {
    /// Snapshot of the current targets, in configuration order.
    fn targets(&self) -> Arc<Vec<TargetDescriptor>>;
}

/// A fixed target list.
#[derive(Debug, Clone, Default)]
pub struct StaticTargets {
    targets: Arc<Vec<TargetDescriptor>>,
}

impl StaticTargets {
    pub fn new(targets: Vec<TargetDescriptor>) -> Self {
        Self {
            targets: Arc::new(targets),
        }
    }
}

impl TargetProvider for StaticTargets {
    fn targets(&self) -> Arc<Vec<TargetDescriptor>> {
        self.targets.clone()
    }
}

/// Target list that can be replaced while the server is running.
#[derive(Debug, Default)]
pub struct SharedTargets {
    current: ArcSwap<Vec<TargetDescriptor>>,
}

impl SharedTargets {
    pub fn new(targets: Vec<TargetDescriptor>) -> Self {
        Self {
            current: ArcSwap::from_pointee(targets),
        }
    }

    /// Build from the `[[targets]]` section of a config.
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.target_descriptors())
    }

    /// Replace the whole list. Checks already in flight keep their snapshot.
    pub fn replace(&self, targets: Vec<TargetDescriptor>) {
        self.current.store(Arc::new(targets));
    }

    /// Apply every config update until the sender goes away.
    pub async fn follow(self: Arc<Self>, mut updates: mpsc::UnboundedReceiver<ProbeConfig>) {
        while let Some(config) = updates.recv().await {
            let targets = config.target_descriptors();
            tracing::info!(
                targets = targets.len(),
                probed = targets.iter().filter(|t| t.is_probed()).count(),
                "Target list reloaded"
            );
            self.replace(targets);
        }
        tracing::debug!("Config update channel closed, target list frozen");
    }
}

impl TargetProvider for SharedTargets {
    fn targets(&self) -> Arc<Vec<TargetDescriptor>> {
        self.current.load_full()
    }
}
