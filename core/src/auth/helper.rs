use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use sshprobe_common::config::{AuthConfig, Config};
use sshprobe_common::error::ProbeError;
use sshprobe_common::network::outcome::Verdict;
use sshprobe_common::network::status::ProbeStatus;

use super::command::{self, ProcessOutput};
use super::{AuthProbe, AuthStrategy};

/// sshpass: the password given to it was rejected.
const SSHPASS_WRONG_PASSWORD: i32 = 5;
/// sshpass: the host key was unknown or changed.
const SSHPASS_HOST_KEY: i32 = 6;
/// sshpass reads the password from this variable with `-e`, keeping it off the command line.
const SSHPASS_ENV: &str = "SSHPASS";

/// Password login with `sshpass` feeding the password to ssh.
pub struct PasswordHelperProbe {
    sshpass: PathBuf,
    ssh: PathBuf,
    auth: AuthConfig,
    timeout: Duration,
}

impl PasswordHelperProbe {
    pub fn new(cfg: &Config) -> Self {
        Self {
            sshpass: cfg.tools.sshpass.clone(),
            ssh: cfg.tools.ssh.clone(),
            auth: cfg.auth.clone(),
            timeout: cfg.timeout,
        }
    }

    fn args(&self, host: &str) -> Vec<String> {
        let mut args = vec!["-e".to_string(), self.ssh.display().to_string()];
        args.extend(command::base_ssh_options(self.timeout));
        args.extend(
            ["PreferredAuthentications=password", "PubkeyAuthentication=no"]
                .into_iter()
                .flat_map(|opt| ["-o".to_string(), opt.to_string()]),
        );
        args.push(self.auth.ssh_target(host));
        args.push(command::remote_echo());
        args
    }
}

#[async_trait]
impl AuthProbe for PasswordHelperProbe {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::PasswordHelper
    }

    async fn authenticate(&self, host: &str) -> Verdict {
        let mut cmd = command::command(&self.sshpass);
        cmd.args(self.args(host))
            .env(SSHPASS_ENV, self.auth.password.as_deref().unwrap_or_default());

        match command::run(cmd, self.timeout).await {
            Ok(output) => classify(&output),
            Err(e) => e
                .into_probe_error(
                    "sshpass command not found - install sshpass for password authentication",
                    self.timeout,
                )
                .into(),
        }
    }
}

fn classify(output: &ProcessOutput) -> Verdict {
    if output.confirmed() {
        return Verdict::success();
    }

    let rejected = match output.code {
        Some(SSHPASS_WRONG_PASSWORD) => "Invalid username or password",
        Some(SSHPASS_HOST_KEY) => "Host key verification failed",
        Some(255) => "SSH authentication failed",
        _ => {
            return Verdict::new(
                ProbeStatus::SshFailed,
                format!("SSH failed with return code {}", output.describe_code()),
            );
        }
    };
    ProbeError::AuthenticationFailure(rejected.to_string()).into()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SENTINEL;

    fn output(code: i32, stdout: &str) -> ProcessOutput {
        ProcessOutput { code: Some(code), stdout: stdout.to_string() }
    }

    fn probe() -> PasswordHelperProbe {
        let mut cfg = Config::default();
        cfg.auth = AuthConfig::password("admin".into(), "hunter2".into());
        PasswordHelperProbe::new(&cfg)
    }

    #[test]
    fn classify_helper_exit_codes() {
        assert_eq!(classify(&output(0, SENTINEL)), Verdict::success());

        let v = classify(&output(5, ""));
        assert_eq!(v, Verdict::new(ProbeStatus::AuthFailed, "Invalid username or password"));

        let v = classify(&output(6, ""));
        assert_eq!(v, Verdict::new(ProbeStatus::AuthFailed, "Host key verification failed"));

        let v = classify(&output(255, ""));
        assert_eq!(v, Verdict::new(ProbeStatus::AuthFailed, "SSH authentication failed"));

        let v = classify(&output(3, ""));
        assert_eq!(v.status, ProbeStatus::SshFailed);
    }

    #[test]
    fn args_force_password_auth_without_leaking_password() {
        let args = probe().args("db01");

        assert_eq!(args[0], "-e");
        assert_eq!(args[1], "ssh");
        assert!(args.windows(2).any(|w| w == ["-o", "PreferredAuthentications=password"]));
        assert!(args.windows(2).any(|w| w == ["-o", "PubkeyAuthentication=no"]));
        assert!(args.contains(&"admin@db01".to_string()));
        assert!(!args.iter().any(|a| a.contains("hunter2")));
    }

    #[tokio::test]
    async fn helper_missing_at_invocation_is_tool_error() {
        let mut probe = probe();
        probe.sshpass = PathBuf::from("/nonexistent/sshpass");
        let verdict = probe.authenticate("db01").await;
        assert_eq!(verdict.status, ProbeStatus::SshError);
        assert!(verdict.detail.contains("sshpass command not found"));
    }
}
