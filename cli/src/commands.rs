pub mod check;
pub mod tools;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use sshprobe_common::config::{
    DEFAULT_MAX_PARALLELISM, DEFAULT_TIMEOUT_SECS, SSH_PORT, ToolPaths,
};

#[derive(Parser)]
#[command(name = "sshprobe")]
#[command(version)]
#[command(about = "Check SSH reachability and login for a list of servers.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every host in a server list
    #[command(alias = "c")]
    Check(CheckArgs),
    /// Show which SSH helper tools are installed
    #[command(alias = "t")]
    Tools(ToolArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Server list file (.txt, one host per line, or .csv, host in the first column)
    #[arg(required_unless_present = "hosts")]
    pub input: Option<PathBuf>,

    /// Comma-separated hosts to probe in addition to the file
    #[arg(long, value_name = "LIST")]
    pub hosts: Option<String>,

    /// Seconds allowed for each connection step (1-300)
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of hosts probed at once (1-100)
    #[arg(short, long, default_value_t = DEFAULT_MAX_PARALLELISM)]
    pub workers: usize,

    /// TCP port the SSH daemons listen on
    #[arg(long, default_value_t = SSH_PORT)]
    pub port: u16,

    /// Username for the SSH logins
    #[arg(short, long)]
    pub username: Option<String>,

    /// Log in with a password instead of keys (prompted if not supplied)
    #[arg(short = 'p', long)]
    pub password_auth: bool,

    /// Password for --password-auth; prefer the environment variable
    #[arg(long, env = "SSHPROBE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Prompt for username and password
    #[arg(short, long)]
    pub interactive: bool,

    /// Write the report to this file instead of the terminal
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only print the final report
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub tools: ToolArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ToolArgs {
    /// ssh executable
    #[arg(long, value_name = "PATH", default_value = "ssh")]
    pub ssh_bin: PathBuf,

    /// sshpass executable
    #[arg(long, value_name = "PATH", default_value = "sshpass")]
    pub sshpass_bin: PathBuf,

    /// expect executable
    #[arg(long, value_name = "PATH", default_value = "expect")]
    pub expect_bin: PathBuf,
}

impl From<ToolArgs> for ToolPaths {
    fn from(args: ToolArgs) -> Self {
        ToolPaths {
            ssh: args.ssh_bin,
            sshpass: args.sshpass_bin,
            expect: args.expect_bin,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
