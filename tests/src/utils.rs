use std::fs;
use std::io::Write;
use std::net::{SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::time::Duration;

use sshprobe_common::config::{AuthConfig, Config, ToolPaths};
use sshprobe_common::network::target::HostTarget;
use tempfile::TempDir;

/// Scratch directory holding shell scripts that stand in for ssh, sshpass and expect.
pub struct FakeTools {
    pub dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    /// Writes an executable `/bin/sh` script called `name`.
    ///
    /// The script is written under a temporary name and renamed into place, so
    /// the final path is never open for writing when something executes it.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let staging = self.dir.path().join(format!(".{name}.tmp"));
        {
            let mut file = fs::File::create(&staging).unwrap();
            write!(file, "#!/bin/sh\n{body}\n").unwrap();
            file.sync_all().unwrap();
        }
        make_executable(&staging);
        fs::rename(&staging, &path).unwrap();
        path
    }

    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}-not-installed"))
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// ssh that "logs in" and runs the remote echo.
    pub fn working_ssh(&self) -> PathBuf {
        self.script("ssh", "echo SSH_CONNECTION_SUCCESS\nexit 0")
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// A bound loopback port. Connects succeed while it is alive.
pub fn open_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A loopback port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    addr.port()
}

pub fn config(port: u16, tools: ToolPaths, auth: AuthConfig) -> Config {
    Config {
        timeout: Duration::from_secs(2),
        max_parallelism: 4,
        port,
        auth,
        tools,
    }
}

pub fn tools(ssh: PathBuf, sshpass: PathBuf, expect: PathBuf) -> ToolPaths {
    ToolPaths { ssh, sshpass, expect }
}

pub fn hosts(names: &[&str]) -> Vec<HostTarget> {
    names.iter().map(|n| n.parse().unwrap()).collect()
}

#[cfg(unix)]
#[test]
fn fake_script_runs_and_leaves_no_staging_file() {
    let fake = FakeTools::new();
    let ssh = fake.working_ssh();

    let output = std::process::Command::new(&ssh).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "SSH_CONNECTION_SUCCESS");

    let entries: Vec<_> = fs::read_dir(fake.dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["ssh"]);
}
