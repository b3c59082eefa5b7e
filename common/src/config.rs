use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const SSH_PORT: u16 = 22;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_PARALLELISM: usize = 20;
pub const TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 1..=300;
pub const PARALLELISM_RANGE: RangeInclusive<usize> = 1..=100;

/// Settings for one sweep. Built once before the run, then only read.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-step bound for resolution, TCP connect and each SSH invocation.
    pub timeout: Duration,
    /// Maximum number of hosts probed at the same instant.
    pub max_parallelism: usize,
    pub port: u16,
    pub auth: AuthConfig,
    pub tools: ToolPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_parallelism: DEFAULT_MAX_PARALLELISM,
            port: SSH_PORT,
            auth: AuthConfig::default(),
            tools: ToolPaths::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.timeout.as_secs();
        if !TIMEOUT_RANGE_SECS.contains(&secs) || self.timeout.subsec_nanos() != 0 {
            return Err(ConfigError::TimeoutOutOfRange(self.timeout.as_secs_f64()));
        }
        if !PARALLELISM_RANGE.contains(&self.max_parallelism) {
            return Err(ConfigError::ParallelismOutOfRange(self.max_parallelism));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    KeyBased,
    PasswordViaHelper,
}

/// Credentials shared read-only by every probe of a run.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub mode: AuthMode,
}

impl AuthConfig {
    pub fn key_based(username: Option<String>) -> Self {
        Self {
            username,
            password: None,
            mode: AuthMode::KeyBased,
        }
    }

    pub fn password(username: String, password: String) -> Self {
        Self {
            username: Some(username),
            password: Some(password),
            mode: AuthMode::PasswordViaHelper,
        }
    }

    /// Password auth is only attempted when the mode asks for it *and* both
    /// halves of the credential are present and non-empty.
    pub fn wants_password(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        self.mode == AuthMode::PasswordViaHelper && present(&self.username) && present(&self.password)
    }

    /// `user@host`, or the bare host when no username is configured.
    pub fn ssh_target(&self, host: &str) -> String {
        match self.username.as_deref() {
            Some(user) if !user.is_empty() => format!("{user}@{host}"),
            _ => host.to_string(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("mode", &self.mode)
            .finish()
    }
}

/// Executables invoked by the auth probes, looked up through `PATH` unless absolute.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub ssh: PathBuf,
    pub sshpass: PathBuf,
    pub expect: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ssh: PathBuf::from("ssh"),
            sshpass: PathBuf::from("sshpass"),
            expect: PathBuf::from("expect"),
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
