use std::ffi::OsStr;
use std::io;
use std::process::Stdio;
use std::time::Duration;

use sshprobe_common::error::ProbeError;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

use super::SENTINEL;

/// Exit status and stdout of a finished child. Stderr is never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the child was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

impl ProcessOutput {
    pub fn confirmed(&self) -> bool {
        self.code == Some(0) && self.stdout.contains(SENTINEL)
    }

    pub fn describe_code(&self) -> String {
        match self.code {
            Some(code) => code.to_string(),
            None => "none (terminated by signal)".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("executable not found")]
    NotFound,

    #[error("timed out")]
    TimedOut,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InvokeError {
    /// The host's error for a child that never finished. `missing` names the absent tool.
    pub fn into_probe_error(self, missing: &str, limit: Duration) -> ProbeError {
        match self {
            InvokeError::TimedOut => ProbeError::Timeout(timed_out_message(limit)),
            InvokeError::NotFound => ProbeError::ToolInvocationFailure(missing.to_string()),
            InvokeError::Io(e) => ProbeError::ToolInvocationFailure(format!("SSH error: {e}")),
        }
    }
}

/// Builds a command with piped stdout and no stdin. The child dies with its future.
pub fn command<S: AsRef<OsStr>>(program: S) -> Command {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Runs `cmd` to completion, giving up after `limit`.
pub async fn run(mut cmd: Command, limit: Duration) -> Result<ProcessOutput, InvokeError> {
    let output = match timeout(limit, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => return Err(InvokeError::NotFound),
        Ok(Err(e)) => return Err(InvokeError::Io(e)),
        Err(_elapsed) => return Err(InvokeError::TimedOut),
    };

    Ok(ProcessOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// `-o` options shared by every ssh invocation.
pub fn base_ssh_options(limit: Duration) -> Vec<String> {
    [
        format!("ConnectTimeout={}", connect_timeout_secs(limit)),
        "StrictHostKeyChecking=no".to_string(),
        "UserKnownHostsFile=/dev/null".to_string(),
        "LogLevel=ERROR".to_string(),
    ]
    .into_iter()
    .flat_map(|opt| ["-o".to_string(), opt])
    .collect()
}

/// The remote command: prints the sentinel and nothing else.
pub fn remote_echo() -> String {
    format!("echo \"{SENTINEL}\"")
}

pub fn connect_timeout_secs(limit: Duration) -> u64 {
    limit.as_secs().max(1)
}

pub fn timed_out_message(limit: Duration) -> String {
    format!(
        "SSH connection timed out after {} seconds",
        limit.as_secs()
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
