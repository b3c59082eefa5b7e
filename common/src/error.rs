use thiserror::Error;

use crate::network::status::ProbeStatus;

/// Failures of a single host probe. None of these ever escape the orchestrator:
/// each one is turned into exactly one terminal [`ProbeStatus`].
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("DNS resolution failed: {0}")]
    DnsFailure(String),

    #[error("{0}")]
    PortUnreachable(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    AuthenticationFailure(String),

    #[error("{0}")]
    ToolInvocationFailure(String),

    #[error("Unexpected error: {0}")]
    UnclassifiedError(String),
}

impl ProbeError {
    pub fn status(&self) -> ProbeStatus {
        match self {
            ProbeError::DnsFailure(_) => ProbeStatus::DnsFailed,
            ProbeError::PortUnreachable(_) => ProbeStatus::PortClosed,
            ProbeError::Timeout(_) => ProbeStatus::Timeout,
            ProbeError::AuthenticationFailure(_) => ProbeStatus::AuthFailed,
            ProbeError::ToolInvocationFailure(_) => ProbeStatus::SshError,
            ProbeError::UnclassifiedError(_) => ProbeStatus::Error,
        }
    }
}

/// Run-level configuration problems, reported before any host is probed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("timeout must be between 1 and 300 seconds (got {0}s)")]
    TimeoutOutOfRange(f64),

    #[error("workers must be between 1 and 100 (got {0})")]
    ParallelismOutOfRange(usize),
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
