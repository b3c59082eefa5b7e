use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use sshprobe_common::config::ToolPaths;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

const DETECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// One external executable and whether it could be started.
#[derive(Debug, Clone)]
pub struct Tool {
    pub name: &'static str,
    pub path: PathBuf,
    pub available: bool,
}

/// Which of the external programs used by the auth strategies exist on this machine.
#[derive(Debug, Clone)]
pub struct ToolInventory {
    pub ssh: Tool,
    pub sshpass: Tool,
    pub expect: Tool,
}

impl ToolInventory {
    pub async fn detect(paths: &ToolPaths) -> Self {
        let (ssh, sshpass, expect) = tokio::join!(
            detect_tool("ssh", &paths.ssh, "-V"),
            detect_tool("sshpass", &paths.sshpass, "-V"),
            detect_tool("expect", &paths.expect, "-v"),
        );
        Self { ssh, sshpass, expect }
    }

    pub fn tools(&self) -> [&Tool; 3] {
        [&self.ssh, &self.sshpass, &self.expect]
    }
}

async fn detect_tool(name: &'static str, path: &Path, version_flag: &str) -> Tool {
    Tool {
        name,
        path: path.to_path_buf(),
        available: is_available(path, version_flag).await,
    }
}

/// Starts `program` with a harmless flag; it counts as available if it could be
/// spawned at all, whatever its exit status.
pub async fn is_available(program: &Path, version_flag: &str) -> bool {
    let status = Command::new(program)
        .arg(version_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    match timeout(DETECTION_TIMEOUT, status).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!(program = %program.display(), error = %e, "tool not usable");
            false
        }
        Err(_elapsed) => {
            debug!(program = %program.display(), "tool did not answer in time");
            false
        }
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
