#![cfg(all(test, unix))]
use std::fs;
use std::path::PathBuf;

use sshprobe_common::config::AuthConfig;
use sshprobe_common::network::status::ProbeStatus;
use sshprobe_core::auth::AuthStrategy;
use sshprobe_core::orchestrator::ProbeOrchestrator;
use sshprobe_core::scanner;

use crate::utils::{self, FakeTools};

fn password_auth(password: &str) -> AuthConfig {
    AuthConfig::password("admin".to_string(), password.to_string())
}

#[tokio::test]
async fn helper_wrong_password_is_auth_failed() {
    let fake = FakeTools::new();
    let sshpass = fake.script("sshpass", "exit 5");
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), sshpass, fake.missing("expect")), password_auth("wrong"));

    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records[0].status, ProbeStatus::AuthFailed);
    assert_eq!(records[0].error, "Invalid username or password");
}

/// The password travels in the environment, never on the command line.
#[tokio::test]
async fn helper_receives_password_through_environment() {
    let fake = FakeTools::new();
    let sshpass = fake.script(
        "sshpass",
        r#"case "$*" in *hunter2*) exit 99;; esac
[ "$SSHPASS" = "hunter2" ] || exit 5
echo SSH_CONNECTION_SUCCESS"#,
    );
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), sshpass, fake.missing("expect")), password_auth("hunter2"));

    let orchestrator = ProbeOrchestrator::new(&cfg).await;
    assert_eq!(orchestrator.strategy(), AuthStrategy::PasswordHelper);

    let record = orchestrator.probe(&"127.0.0.1".parse().unwrap()).await;
    assert_eq!(record.status, ProbeStatus::Success, "{}", record.error);
}

#[tokio::test]
async fn missing_helper_falls_back_to_expect_and_cleans_up() {
    let fake = FakeTools::new();
    let marker: PathBuf = fake.path("script-path");
    let expect = fake.script(
        "expect",
        &format!(
            r#"[ -f "$1" ] || exit 1
grep -q SSH_CONNECTION_SUCCESS "$1" || exit 1
echo "$1" > "{}"
exit 0"#,
            marker.display()
        ),
    );
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), fake.missing("sshpass"), expect), password_auth("pw"));

    let orchestrator = ProbeOrchestrator::new(&cfg).await;
    assert_eq!(orchestrator.strategy(), AuthStrategy::ExpectFallback);

    let record = orchestrator.probe(&"127.0.0.1".parse().unwrap()).await;
    assert_eq!(record.status, ProbeStatus::Success, "{}", record.error);

    let script = fs::read_to_string(&marker).unwrap();
    let script = PathBuf::from(script.trim());
    assert!(script.to_string_lossy().ends_with(".exp"));
    assert!(!script.exists(), "expect script left behind at {}", script.display());
}

#[tokio::test]
async fn expect_permission_denied_is_auth_failed() {
    let fake = FakeTools::new();
    let expect = fake.script("expect", "exit 2");
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), fake.missing("sshpass"), expect), password_auth("pw"));

    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records[0].status, ProbeStatus::AuthFailed);
    assert_eq!(records[0].error, "Invalid username or password");
}

#[tokio::test]
async fn neither_helper_installed_is_ssh_error() {
    let fake = FakeTools::new();
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.working_ssh(), fake.missing("sshpass"), fake.missing("expect")), password_auth("pw"));

    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records[0].status, ProbeStatus::SshError);
    assert!(records[0].error.starts_with("expect command not found"));
}

#[tokio::test]
async fn key_login_rejected_is_auth_failed() {
    let fake = FakeTools::new();
    let ssh = fake.script("ssh", "echo 'Permission denied (publickey).' >&2\nexit 255");
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(ssh, fake.missing("sshpass"), fake.missing("expect")), AuthConfig::key_based(None));

    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records[0].status, ProbeStatus::AuthFailed);
    assert_eq!(records[0].error, "SSH authentication failed or connection refused");
}

#[tokio::test]
async fn missing_ssh_is_ssh_error() {
    let fake = FakeTools::new();
    let (_listener, port) = utils::open_port();
    let cfg = utils::config(port, utils::tools(fake.missing("ssh"), fake.missing("sshpass"), fake.missing("expect")), AuthConfig::key_based(None));

    let records = scanner::perform_sweep(utils::hosts(&["127.0.0.1"]), &cfg, None).await.unwrap();

    assert_eq!(records[0].status, ProbeStatus::SshError);
    assert_eq!(records[0].error, "ssh command not found");
}
