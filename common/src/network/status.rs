use std::fmt;
use std::str::FromStr;

/// Closed set of terminal classifications for one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProbeStatus {
    Success,
    AuthFailed,
    DnsFailed,
    PortClosed,
    Timeout,
    SshFailed,
    SshError,
    Error,
}

impl ProbeStatus {
    pub const ALL: [ProbeStatus; 8] = [
        ProbeStatus::Success,
        ProbeStatus::AuthFailed,
        ProbeStatus::DnsFailed,
        ProbeStatus::PortClosed,
        ProbeStatus::Timeout,
        ProbeStatus::SshFailed,
        ProbeStatus::SshError,
        ProbeStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Success => "SUCCESS",
            ProbeStatus::AuthFailed => "AUTH_FAILED",
            ProbeStatus::DnsFailed => "DNS_FAILED",
            ProbeStatus::PortClosed => "PORT_CLOSED",
            ProbeStatus::Timeout => "TIMEOUT",
            ProbeStatus::SshFailed => "SSH_FAILED",
            ProbeStatus::SshError => "SSH_ERROR",
            ProbeStatus::Error => "ERROR",
        }
    }

    /// An SSH daemon answered, whether or not it let us in.
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeStatus::Success | ProbeStatus::AuthFailed)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProbeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProbeStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown probe status: {s}"))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
