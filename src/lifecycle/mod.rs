//! Lifecycle management.
//!
//! ```text
//! Startup:  load config → init logging/metrics → bind → serve
//! Shutdown: Ctrl+C or Shutdown::trigger → stop accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
