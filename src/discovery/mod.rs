//! Target discovery subsystem.
//!
//! # Data Flow
//! ```text
//! ProbeConfig.targets
//!     → TargetDescriptor (one per configured upstream)
//!     → provider.rs (StaticTargets / SharedTargets)
//!     → health checker reads a snapshot per check
//!
//! On config reload:
//!     watcher → SharedTargets::follow → atomic swap of the snapshot
//! ```
//!
//! # Design Decisions
//! - Providers hand out immutable snapshots; a running check never sees the
//!   list change underneath it
//! - An empty probe URL keeps the target in the total without probing it

pub mod provider;

pub use provider::{SharedTargets, StaticTargets, TargetProvider};

use crate::config::TargetConfig;

/// One upstream service as seen by the health checker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetDescriptor {
    /// Informational name, used in logs only.
    pub name: String,
    /// URL to GET for liveness. Empty means "not probed".
    pub probe_url: String,
}

impl TargetDescriptor {
    pub fn new(name: impl Into<String>, probe_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            probe_url: probe_url.into(),
        }
    }

    /// Target without a probe URL.
    pub fn unprobed(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn is_probed(&self) -> bool {
        !self.probe_url.is_empty()
    }
}

impl From<&TargetConfig> for TargetDescriptor {
    fn from(config: &TargetConfig) -> Self {
        Self::new(config.name.clone(), config.probe_url.clone())
    }
}
