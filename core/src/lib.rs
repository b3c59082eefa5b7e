//! # sshprobe engine
//!
//! Classifies hosts by how far an SSH login gets: name resolution, TCP reachability
//! of the SSH port, then one of several authentication strategies.
//!
//! * [`network`]: resolution and connect-with-timeout.
//! * [`auth`]: the interchangeable authentication strategies.
//! * [`orchestrator`]: the per-host state machine.
//! * [`scanner`]: bounded-parallel execution over a host list.
//! * [`system`]: detection of the external tools the strategies rely on.

pub mod auth;
pub mod network;
pub mod orchestrator;
pub mod scanner;
pub mod system;
