use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use sshprobe_common::config::{AuthConfig, Config};
use sshprobe_common::error::ProbeError;
use sshprobe_common::network::outcome::Verdict;
use sshprobe_common::network::status::ProbeStatus;
use tempfile::NamedTempFile;
use tracing::debug;

use super::command::{self, ProcessOutput};
use super::{AuthProbe, AuthStrategy, SENTINEL};

const EXIT_SUCCESS: i32 = 0;
const EXIT_PERMISSION_DENIED: i32 = 2;
const EXIT_TIMEOUT: i32 = 3;
/// Extra time the expect process gets on top of its own `set timeout`.
const EXPECT_GRACE: Duration = Duration::from_secs(5);

/// Password login driven by a generated expect script, for hosts without sshpass.
pub struct ExpectFallbackProbe {
    expect: PathBuf,
    ssh: PathBuf,
    auth: AuthConfig,
    timeout: Duration,
}

impl ExpectFallbackProbe {
    pub fn new(cfg: &Config) -> Self {
        Self {
            expect: cfg.tools.expect.clone(),
            ssh: cfg.tools.ssh.clone(),
            auth: cfg.auth.clone(),
            timeout: cfg.timeout,
        }
    }

    fn script(&self, host: &str) -> String {
        let secs = command::connect_timeout_secs(self.timeout);
        let ssh = tcl_escape(&self.ssh.display().to_string());
        let target = tcl_escape(&self.auth.ssh_target(host));
        let password = tcl_escape(self.auth.password.as_deref().unwrap_or_default());

        format!(
            r#"set timeout {secs}
log_user 0
spawn "{ssh}" -o ConnectTimeout={secs} -o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null -o LogLevel=ERROR "{target}" "echo {SENTINEL}"
expect {{
    -nocase "password:" {{
        send -- "{password}\r"
        expect {{
            "{SENTINEL}" {{ exit {EXIT_SUCCESS} }}
            -nocase "password:" {{ exit {EXIT_PERMISSION_DENIED} }}
            "Permission denied" {{ exit {EXIT_PERMISSION_DENIED} }}
            timeout {{ exit 1 }}
            eof {{ exit 1 }}
        }}
    }}
    "{SENTINEL}" {{ exit {EXIT_SUCCESS} }}
    "Permission denied" {{ exit {EXIT_PERMISSION_DENIED} }}
    timeout {{ exit {EXIT_TIMEOUT} }}
    eof {{ exit 1 }}
}}
"#
        )
    }

    /// Writes the script to a private temp file. The file is removed when the
    /// returned handle is dropped.
    fn write_script(&self, host: &str) -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("sshprobe-")
            .suffix(".exp")
            .tempfile()?;
        file.write_all(self.script(host).as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    fn classify(&self, output: &ProcessOutput) -> Verdict {
        match output.code {
            Some(EXIT_SUCCESS) => Verdict::success(),
            Some(EXIT_PERMISSION_DENIED) => {
                ProbeError::AuthenticationFailure("Invalid username or password".to_string()).into()
            }
            Some(EXIT_TIMEOUT) => ProbeError::Timeout(command::timed_out_message(self.timeout)).into(),
            _ => Verdict::new(ProbeStatus::SshFailed, "SSH connection failed"),
        }
    }
}

#[async_trait]
impl AuthProbe for ExpectFallbackProbe {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::ExpectFallback
    }

    async fn authenticate(&self, host: &str) -> Verdict {
        let script = match self.write_script(host) {
            Ok(script) => script,
            Err(e) => {
                return ProbeError::ToolInvocationFailure(format!(
                    "SSH error: could not create expect script: {e}"
                ))
                .into();
            }
        };
        debug!(host, script = %script.path().display(), "running expect fallback");

        let mut cmd = command::command(&self.expect);
        cmd.arg(script.path());

        let verdict = match command::run(cmd, self.timeout + EXPECT_GRACE).await {
            Ok(output) => self.classify(&output),
            Err(e) => e
                .into_probe_error(
                    "expect command not found - install expect or sshpass for password authentication",
                    self.timeout,
                )
                .into(),
        };

        drop(script);
        verdict
    }
}

/// Escapes `raw` for use inside a double-quoted Tcl word so no substitution happens.
fn tcl_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '"' | '[' | ']' | '$' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
