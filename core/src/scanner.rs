//! Bounded-parallel execution of the probe orchestrator over a host list.
//!
//! A fixed pool of `min(W, N)` workers pulls hosts from a shared queue; each worker
//! carries one host to its terminal state before taking the next, so at most `W`
//! probes are in flight at any instant. Completion order, and therefore the order
//! of progress events and records, follows network latency and is not stable.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Local;
use sshprobe_common::config::Config;
use sshprobe_common::error::{ConfigError, ProbeError};
use sshprobe_common::network::outcome::{OutcomeRecord, Verdict};
use sshprobe_common::network::status::ProbeStatus;
use sshprobe_common::network::target::HostTarget;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::auth::AuthStrategy;
use crate::orchestrator::ProbeOrchestrator;

mod results;

pub use results::ResultSet;

/// Emitted once per host, right after its record is stored.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub hostname: String,
    pub status: ProbeStatus,
    pub elapsed: Duration,
    /// 1-based position in completion order.
    pub index: usize,
    pub total: usize,
}

pub type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("no valid hosts to probe")]
    NoHosts,
}

type HostQueue = Mutex<std::vec::IntoIter<HostTarget>>;

pub struct Sweep {
    orchestrator: Arc<ProbeOrchestrator>,
    max_parallelism: usize,
}

impl Sweep {
    /// Validates `cfg` and prepares the orchestrator. No host is touched yet.
    pub async fn new(cfg: &Config) -> Result<Self, SweepError> {
        cfg.validate()?;
        let orchestrator = ProbeOrchestrator::new(cfg).await;
        Ok(Self::from_orchestrator(orchestrator, cfg.max_parallelism))
    }

    pub fn from_orchestrator(orchestrator: ProbeOrchestrator, max_parallelism: usize) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            max_parallelism: max_parallelism.max(1),
        }
    }

    pub fn strategy(&self) -> AuthStrategy {
        self.orchestrator.strategy()
    }

    /// Probes every host and returns exactly one record per input host.
    pub async fn run(
        &self,
        hosts: Vec<HostTarget>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Vec<OutcomeRecord>, SweepError> {
        if hosts.is_empty() {
            return Err(SweepError::NoHosts);
        }

        let total: usize = hosts.len();
        let queue: Arc<HostQueue> = Arc::new(Mutex::new(hosts.into_iter()));
        let results: Arc<ResultSet> = Arc::new(ResultSet::with_capacity(total));
        let callback: Option<Arc<ProgressCallback>> = on_progress.map(Arc::new);
        let workers: usize = self.max_parallelism.min(total);

        debug!(total, workers, "starting sweep");

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            let queue = Arc::clone(&queue);
            let results = Arc::clone(&results);
            let orchestrator = Arc::clone(&self.orchestrator);
            let callback = callback.clone();

            pool.spawn(async move {
                while let Some(host) = next_host(&queue) {
                    let record = orchestrator.probe(&host).await;
                    let mut event = ProgressEvent {
                        hostname: record.hostname.clone(),
                        status: record.status,
                        elapsed: record.elapsed,
                        index: 0,
                        total,
                    };
                    event.index = results.push(record);

                    if let Some(cb) = &callback {
                        cb(&event);
                    }
                }
                debug!(worker_id, "worker drained queue");
            });
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!("sweep worker terminated abnormally: {e}");
            }
        }

        // Hosts left behind by dead workers still get a record.
        while let Some(host) = next_host(&queue) {
            let verdict = Verdict::from(ProbeError::UnclassifiedError(
                "worker terminated before probing this host".to_string(),
            ));
            results.push(OutcomeRecord::new(host.into_inner(), verdict, Duration::ZERO, Local::now()));
        }

        let records = match Arc::try_unwrap(results) {
            Ok(set) => set.into_records(),
            Err(shared) => shared.take(),
        };

        if records.len() != total {
            error!(
                expected = total,
                got = records.len(),
                "sweep lost records for hosts that were in flight"
            );
        }
        Ok(records)
    }
}

/// Probes all `hosts` under `cfg`. An empty list is rejected before the
/// configuration is validated or any tool is looked up.
pub async fn perform_sweep(
    hosts: Vec<HostTarget>,
    cfg: &Config,
    on_progress: Option<ProgressCallback>,
) -> Result<Vec<OutcomeRecord>, SweepError> {
    if hosts.is_empty() {
        return Err(SweepError::NoHosts);
    }

    Sweep::new(cfg).await?.run(hosts, on_progress).await
}

fn next_host(queue: &HostQueue) -> Option<HostTarget> {
    queue.lock().unwrap_or_else(PoisonError::into_inner).next()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
