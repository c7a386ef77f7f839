//! Aggregate liveness probe for a set of upstream targets.

pub mod config;
pub mod discovery;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ProbeConfig;
pub use discovery::{TargetDescriptor, TargetProvider};
pub use health::{AggregateResult, HealthChecker};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
