//! Shared building blocks for `sshprobe`.
//!
//! Everything in here is free of network and process I/O: run configuration,
//! the host and outcome models, the error taxonomy and the terminal log macros.

pub mod config;
pub mod error;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;
