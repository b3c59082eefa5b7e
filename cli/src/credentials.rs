//! Resolves the credentials a sweep runs with, prompting when asked to.

use std::io;

use console::Term;
use sshprobe_common::config::AuthConfig;

pub trait Prompt {
    fn line(&mut self, prompt: &str) -> io::Result<String>;
    fn secret(&mut self, prompt: &str) -> io::Result<String>;
}

pub struct TermPrompt {
    term: Term,
}

impl TermPrompt {
    pub fn stderr() -> Self {
        Self { term: Term::stderr() }
    }
}

impl Prompt for TermPrompt {
    fn line(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.read_line()
    }

    fn secret(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.read_secure_line()
    }
}

/// What the command line asked for.
#[derive(Debug, Default, Clone)]
pub struct CredentialRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_auth: bool,
    pub interactive: bool,
}

/// `--interactive` always asks for a username and then a password.
/// `--password-auth` asks for whatever is missing. A password supplied up
/// front together with a username switches to password mode on its own.
/// An empty username leaves the sweep key-based as the current user.
pub fn resolve(request: CredentialRequest, prompt: &mut dyn Prompt) -> io::Result<AuthConfig> {
    let CredentialRequest { username, password, password_auth, interactive } = request;

    let username = if interactive || (password_auth && username.is_none()) {
        Some(prompt.line("Username: ")?)
    } else {
        username
    };
    let username = username.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());

    let Some(username) = username else {
        return Ok(AuthConfig::key_based(None));
    };

    if !(interactive || password_auth || password.is_some()) {
        return Ok(AuthConfig::key_based(Some(username)));
    }

    let password = match password.filter(|p| !p.is_empty()) {
        Some(p) if !interactive => p,
        _ => prompt.secret(&format!("Password for {username}: "))?,
    };

    if password.is_empty() {
        return Ok(AuthConfig::key_based(Some(username)));
    }
    Ok(AuthConfig::password(username, password))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
