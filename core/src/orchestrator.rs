//! The per-host **probe state machine**.
//!
//! ```text
//! INIT → DNS_CHECK → PORT_CHECK → AUTH_CHECK → TERMINAL
//!            │            │
//!            └────────────┴──────────────────→ TERMINAL
//! ```
//!
//! Each state either advances or jumps straight to `TERMINAL` with a [`Verdict`].
//! The sequence runs in its own task so that a panic anywhere inside it becomes an
//! `ERROR` record for that host instead of taking the run down.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use sshprobe_common::config::Config;
use sshprobe_common::error::ProbeError;
use sshprobe_common::network::outcome::{OutcomeRecord, Verdict};
use sshprobe_common::network::target::HostTarget;
use tokio::task::JoinError;
use tracing::{debug, info};

use crate::auth::{self, AuthProbe, AuthStrategy};
use crate::network::port;

#[derive(Debug)]
enum ProbeState {
    Init,
    DnsCheck,
    PortCheck(Vec<SocketAddr>),
    AuthCheck,
    Terminal(Verdict),
}

impl ProbeState {
    fn name(&self) -> &'static str {
        match self {
            ProbeState::Init => "INIT",
            ProbeState::DnsCheck => "DNS_CHECK",
            ProbeState::PortCheck(_) => "PORT_CHECK",
            ProbeState::AuthCheck => "AUTH_CHECK",
            ProbeState::Terminal(_) => "TERMINAL",
        }
    }
}

/// Runs the full probe sequence for one host at a time. Cheap to share between workers.
pub struct ProbeOrchestrator {
    timeout: Duration,
    port: u16,
    auth: Arc<dyn AuthProbe>,
}

impl ProbeOrchestrator {
    /// Builds the orchestrator, probing once for the auth helper tools.
    pub async fn new(cfg: &Config) -> Self {
        let auth = auth::select_strategy(cfg).await;
        Self::with_auth_probe(cfg, auth)
    }

    pub fn with_auth_probe(cfg: &Config, auth: Arc<dyn AuthProbe>) -> Self {
        Self {
            timeout: cfg.timeout,
            port: cfg.port,
            auth,
        }
    }

    pub fn strategy(&self) -> AuthStrategy {
        self.auth.strategy()
    }

    /// Probes `host` to a terminal state. Always yields a record.
    pub async fn probe(&self, host: &HostTarget) -> OutcomeRecord {
        let start = Instant::now();
        let sequence = Sequence {
            host: host.as_str().to_string(),
            port: self.port,
            timeout: self.timeout,
            auth: Arc::clone(&self.auth),
        };

        let verdict = match tokio::spawn(sequence.run()).await {
            Ok(verdict) => verdict,
            Err(e) => Verdict::from(ProbeError::UnclassifiedError(describe_join_error(e))),
        };

        let record = OutcomeRecord::new(host.as_str(), verdict, start.elapsed(), Local::now());
        info!(
            host = %record.hostname,
            status = %record.status,
            elapsed = record.elapsed_secs(),
            "probe finished"
        );
        record
    }
}

struct Sequence {
    host: String,
    port: u16,
    timeout: Duration,
    auth: Arc<dyn AuthProbe>,
}

impl Sequence {
    async fn run(self) -> Verdict {
        let mut state = ProbeState::Init;

        loop {
            debug!(host = %self.host, state = state.name());

            state = match state {
                ProbeState::Init => ProbeState::DnsCheck,
                ProbeState::DnsCheck => match port::resolve(&self.host, self.port, self.timeout).await {
                    Ok(addrs) => ProbeState::PortCheck(addrs),
                    Err(e) => ProbeState::Terminal(e.into()),
                },
                ProbeState::PortCheck(addrs) => match port::connect(&addrs, self.timeout).await {
                    Ok(()) => ProbeState::AuthCheck,
                    Err(e) => ProbeState::Terminal(e.into()),
                },
                ProbeState::AuthCheck => ProbeState::Terminal(self.auth.authenticate(&self.host).await),
                ProbeState::Terminal(verdict) => return verdict,
            };
        }
    }
}

fn describe_join_error(e: JoinError) -> String {
    if !e.is_panic() {
        return "probe task was cancelled".to_string();
    }

    let payload = e.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("probe panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("probe panicked: {msg}")
    } else {
        "probe panicked".to_string()
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
