use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use sshprobe_common::config::{AuthConfig, Config};
use sshprobe_common::error::ProbeError;
use sshprobe_common::network::outcome::Verdict;
use sshprobe_common::network::status::ProbeStatus;

use super::command::{self, ProcessOutput};
use super::{AuthProbe, AuthStrategy};

/// Login with whatever keys/agent the current user has, never prompting.
pub struct KeyBasedProbe {
    ssh: PathBuf,
    auth: AuthConfig,
    timeout: Duration,
}

impl KeyBasedProbe {
    pub fn new(cfg: &Config) -> Self {
        Self {
            ssh: cfg.tools.ssh.clone(),
            auth: cfg.auth.clone(),
            timeout: cfg.timeout,
        }
    }

    fn args(&self, host: &str) -> Vec<String> {
        let mut args = command::base_ssh_options(self.timeout);
        args.extend(["-o".to_string(), "BatchMode=yes".to_string()]);
        args.push(self.auth.ssh_target(host));
        args.push(command::remote_echo());
        args
    }
}

#[async_trait]
impl AuthProbe for KeyBasedProbe {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::KeyBased
    }

    async fn authenticate(&self, host: &str) -> Verdict {
        let mut cmd = command::command(&self.ssh);
        cmd.args(self.args(host));

        match command::run(cmd, self.timeout).await {
            Ok(output) => classify(&output),
            Err(e) => e.into_probe_error("ssh command not found", self.timeout).into(),
        }
    }
}

/// Exit 255 covers both a rejected key and a connection-level failure; ssh does
/// not tell them apart.
fn classify(output: &ProcessOutput) -> Verdict {
    if output.confirmed() {
        return Verdict::success();
    }

    match output.code {
        Some(255) => ProbeError::AuthenticationFailure(
            "SSH authentication failed or connection refused".to_string(),
        )
        .into(),
        _ => Verdict::new(
            ProbeStatus::SshFailed,
            format!("SSH failed with return code {}", output.describe_code()),
        ),
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
