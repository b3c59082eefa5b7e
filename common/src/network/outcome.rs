use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::ProbeError;
use crate::network::status::ProbeStatus;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Classification produced by one probe step: a status plus an operator-facing detail.
///
/// The detail is empty on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: ProbeStatus,
    pub detail: String,
}

impl Verdict {
    pub fn new(status: ProbeStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(ProbeStatus::Success, "")
    }
}

impl From<ProbeError> for Verdict {
    fn from(err: ProbeError) -> Self {
        Self::new(err.status(), err.to_string())
    }
}

/// Final result for one host. Created once when its probe terminates and never changed.
#[derive(Debug, Clone)]
pub struct OutcomeRecord {
    pub hostname: String,
    pub status: ProbeStatus,
    pub elapsed: Duration,
    pub error: String,
    pub timestamp: DateTime<Local>,
}

impl OutcomeRecord {
    pub fn new(hostname: impl Into<String>, verdict: Verdict, elapsed: Duration, timestamp: DateTime<Local>) -> Self {
        Self {
            hostname: hostname.into(),
            status: verdict.status,
            elapsed,
            error: verdict.detail,
            timestamp,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
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
