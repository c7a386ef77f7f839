//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new ProbeConfig sent to the target provider
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Only the target list is hot-reloaded; listener and timeouts need a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    HealthCheckConfig, ListenerConfig, ObservabilityConfig, ProbeConfig, TargetConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
