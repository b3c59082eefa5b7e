#![cfg(test)]
use std::collections::HashSet;
use std::time::{Duration, Instant};

use sshprobe_common::config::AuthConfig;
use sshprobe_common::network::outcome::OutcomeRecord;
use sshprobe_common::network::status::ProbeStatus;
use sshprobe_core::orchestrator::ProbeOrchestrator;
use sshprobe_core::scanner::{self, SweepError};

use crate::utils::{self, FakeTools};

fn key_auth() -> AuthConfig {
    AuthConfig::key_based(None)
}

/// A name under the reserved `.invalid` TLD never resolves.
#[tokio::test]
async fn unresolvable_host_is_dns_failed() {
    let fake = FakeTools::new();
    let cfg = utils::config(22, utils::tools(fake.working_ssh(), fake.missing("sshpass"), fake.missing("expect")), key_auth());

    let orchestrator = ProbeOrchestrator::new(&cfg).await;
    let record = orchestrator.probe(&"nonexistent-host-xyz.invalid".parse().unwrap()).await;

    assert_eq!(record.status, ProbeStatus::DnsFailed);
    assert!(record.error.starts_with("DNS resolution failed"), "{}", record.error);
    assert_eq!(record.hostname, "nonexistent-host-xyz.invalid");
}

/// Entries with a space are kept and fail at the resolver, never dropped silently.
#[tokio::test]
async fn host_with_inner_space_is_dns_failed() {
    let fake = FakeTools::new();
    let cfg = utils::config(22, utils::tools(fake.working_ssh(), fake.missing("sshpass"), fake.missing("expect")), key_auth());

    let records = scanner::perform_sweep(utils::hosts(&["web 02.invalid"]), &cfg, None).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hostname, "web 02.invalid");
    assert_eq!(records[0].status, ProbeStatus::DnsFailed);
}

#[tokio::test]
async fn closed_port_is_port_closed() {
    let fake = FakeTools::new();
    let port = utils::closed_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), fake.missing("sshpass"), fake.missing("expect")), key_auth());

    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ProbeStatus::PortClosed);
    assert_eq!(records[0].error, format!("SSH port {port} is not accessible"));
}

#[cfg(unix)]
#[tokio::test]
async fn key_login_success_has_empty_error() {
    let fake = FakeTools::new();
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), fake.missing("sshpass"), fake.missing("expect")), key_auth());

    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records[0].status, ProbeStatus::Success);
    assert!(records[0].error.is_empty());
    assert!(records[0].elapsed < Duration::from_secs(2));
}

#[cfg(unix)]
#[tokio::test]
async fn stalled_ssh_is_timeout() {
    let fake = FakeTools::new();
    let ssh = fake.script("ssh", "sleep 10\necho SSH_CONNECTION_SUCCESS");
    let (_listener, port) = utils::open_port();
    let mut cfg = utils::config(port, utils::tools(ssh, fake.missing("sshpass"), fake.missing("expect")), key_auth());
    cfg.timeout = Duration::from_secs(1);

    let start = Instant::now();
    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records[0].status, ProbeStatus::Timeout);
    assert_eq!(records[0].error, "SSH connection timed out after 1 seconds");
    assert!(start.elapsed() < Duration::from_secs(5));
}

/// Every input host gets exactly one record, whatever happens to it.
#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_record_per_host_with_mixed_outcomes() {
    let fake = FakeTools::new();
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), fake.missing("sshpass"), fake.missing("expect")), key_auth());

    let names = ["127.0.0.1", "localhost", "nonexistent-host-xyz.invalid", "127.0.0.1", "also-missing.invalid"];
    let records = scanner::perform_sweep(utils::hosts(&names), &cfg, None).await.unwrap();

    assert_eq!(records.len(), names.len());
    let mut seen: Vec<&str> = records.iter().map(|r| r.hostname.as_str()).collect();
    seen.sort();
    let mut expected = names.to_vec();
    expected.sort();
    assert_eq!(seen, expected);

    let failed = records.iter().filter(|r| r.status == ProbeStatus::DnsFailed).count();
    assert_eq!(failed, 2);
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallelism_bounds_wall_time() {
    let fake = FakeTools::new();
    let ssh = fake.script("ssh", "sleep 1\necho SSH_CONNECTION_SUCCESS");
    let (_listener, port) = utils::open_port();
    let hosts = utils::hosts(&["127.0.0.1", "127.0.0.1", "127.0.0.1", "127.0.0.1"]);

    let mut cfg = utils::config(port, utils::tools(ssh, fake.missing("sshpass"), fake.missing("expect")), key_auth());
    cfg.timeout = Duration::from_secs(5);

    cfg.max_parallelism = 1;
    let start = Instant::now();
    let serial = scanner::perform_sweep(hosts.clone(), &cfg, None).await.unwrap();
    let serial_time = start.elapsed();

    cfg.max_parallelism = 4;
    let start = Instant::now();
    let parallel = scanner::perform_sweep(hosts, &cfg, None).await.unwrap();
    let parallel_time = start.elapsed();

    assert!(serial.iter().chain(&parallel).all(|r| r.status == ProbeStatus::Success));
    let summed: Duration = serial.iter().map(|r| r.elapsed).sum();
    assert!(serial_time >= summed, "serial {serial_time:?} < summed {summed:?}");
    assert!(serial_time >= Duration::from_secs(4));
    assert!(parallel_time < Duration::from_secs(3), "parallel took {parallel_time:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn repeated_sweeps_agree() {
    let fake = FakeTools::new();
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), fake.missing("sshpass"), fake.missing("expect")), key_auth());
    let hosts = utils::hosts(&["127.0.0.1", "nonexistent-host-xyz.invalid"]);

    let first = scanner::perform_sweep(hosts.clone(), &cfg, None).await.unwrap();
    let second = scanner::perform_sweep(hosts, &cfg, None).await.unwrap();

    assert_eq!(outcomes(&first), outcomes(&second));
}

fn outcomes(records: &[OutcomeRecord]) -> HashSet<(String, ProbeStatus)> {
    records.iter().map(|r| (r.hostname.clone(), r.status)).collect()
}

#[tokio::test]
async fn empty_host_list_is_rejected() {
    let cfg = utils::config(22, Default::default(), key_auth());
    let err = scanner::perform_sweep(Vec::new(), &cfg, None).await.unwrap_err();
    assert!(matches!(err, SweepError::NoHosts));
}

/// Needs working DNS and a routable network; run with `--ignored`.
#[tokio::test]
#[ignore]
async fn blackholed_address_times_out_on_connect() {
    let mut cfg = utils::config(22, Default::default(), key_auth());
    cfg.timeout = Duration::from_secs(1);

    let records = scanner::perform_sweep(utils::hosts(&["10.255.255.1"]), &cfg, None).await.unwrap();
    assert_eq!(records[0].status, ProbeStatus::Timeout);
}
