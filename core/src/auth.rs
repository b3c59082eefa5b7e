//! The **authentication** stage of a probe.
//!
//! Every strategy implements [`AuthProbe`]: given a host whose SSH port is known to
//! accept connections, run the system SSH client once with a side-effect-free remote
//! `echo` and turn its exit status into a [`Verdict`].
//!
//! The strategy is picked once per run by [`select_strategy`]:
//! * no usable password → [`KeyBasedProbe`]
//! * password + `sshpass` installed → [`PasswordHelperProbe`]
//! * password, no `sshpass` → [`ExpectFallbackProbe`]
//!
//! Host-key checking is switched off for every strategy. This tool answers "can we
//! log in", it does not vouch for who answered.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use sshprobe_common::config::Config;
use sshprobe_common::network::outcome::Verdict;
use tracing::{debug, warn};

use crate::system;

mod command;
mod expect;
mod helper;
mod key;

pub use expect::ExpectFallbackProbe;
pub use helper::PasswordHelperProbe;
pub use key::KeyBasedProbe;

/// Marker echoed by the remote side. Exit code 0 alone is not trusted.
pub const SENTINEL: &str = "SSH_CONNECTION_SUCCESS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    KeyBased,
    PasswordHelper,
    ExpectFallback,
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthStrategy::KeyBased => "key-based (ssh BatchMode)",
            AuthStrategy::PasswordHelper => "password via sshpass",
            AuthStrategy::ExpectFallback => "password via expect script",
        };
        f.write_str(name)
    }
}

#[async_trait]
pub trait AuthProbe: Send + Sync {
    fn strategy(&self) -> AuthStrategy;

    /// Attempts a login on `host`. Never fails: every outcome is a verdict.
    async fn authenticate(&self, host: &str) -> Verdict;
}

/// Chooses the strategy for a whole run from the auth settings and what is installed.
pub async fn select_strategy(cfg: &Config) -> Arc<dyn AuthProbe> {
    if !cfg.auth.wants_password() {
        debug!("using key-based authentication");
        return Arc::new(KeyBasedProbe::new(cfg));
    }

    if system::is_available(&cfg.tools.sshpass, "-V").await {
        debug!("sshpass found, using it for password authentication");
        Arc::new(PasswordHelperProbe::new(cfg))
    } else {
        warn!(
            helper = %cfg.tools.sshpass.display(),
            "password helper not found, falling back to an expect script"
        );
        Arc::new(ExpectFallbackProbe::new(cfg))
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
