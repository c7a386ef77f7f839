//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → middleware.rs (GET .../health ? health check : next stage)
//!     → health::response (status + JSON body)
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{health_middleware, is_health_request, with_health_check};
pub use server::HttpServer;
