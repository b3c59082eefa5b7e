use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{Instrument, Span, info_span};

use crate::commands::CheckArgs;
use crate::credentials::{self, CredentialRequest, TermPrompt};
use crate::loader;
use crate::mprint;
use crate::terminal::{colors, print, report, spinner};
use sshprobe_common::config::{AuthMode, Config};
use sshprobe_common::network::outcome::OutcomeRecord;
use sshprobe_common::network::status::ProbeStatus;
use sshprobe_common::network::target::{self, HostTarget};
use sshprobe_common::{info, success, warn};
use sshprobe_core::scanner::{ProgressCallback, ProgressEvent, Sweep};

/// Everything gathered before the sweep starts: settings, credentials and hosts.
pub struct CheckPlan {
    cfg: Config,
    hosts: Vec<HostTarget>,
    source: String,
    output: Option<PathBuf>,
    quiet: bool,
}

/// Synchronous half of `check`. May prompt on the terminal, so it runs before
/// the Ctrl-C handler is installed.
pub fn prepare(args: CheckArgs) -> anyhow::Result<CheckPlan> {
    let mut cfg = Config {
        timeout: Duration::from_secs(args.timeout),
        max_parallelism: args.workers,
        port: args.port,
        tools: args.tools.into(),
        ..Config::default()
    };
    cfg.validate()?;

    let mut hosts: Vec<HostTarget> = Vec::new();
    let mut sources: Vec<String> = Vec::new();
    if let Some(path) = &args.input {
        hosts.extend(loader::load_hosts(path)?);
        sources.push(path.display().to_string());
    }
    if let Some(list) = &args.hosts {
        let extra = target::parse_commas(list).map_err(anyhow::Error::msg)?;
        hosts.extend(extra);
        sources.push("--hosts".to_string());
    }
    if hosts.is_empty() {
        anyhow::bail!("No valid server names to check");
    }

    let request = CredentialRequest {
        username: args.username,
        password: args.password,
        password_auth: args.password_auth,
        interactive: args.interactive,
    };
    cfg.auth = credentials::resolve(request, &mut TermPrompt::stderr())
        .context("failed to read credentials")?;

    Ok(CheckPlan {
        cfg,
        hosts,
        source: sources.join(" + "),
        output: args.output,
        quiet: args.quiet,
    })
}

pub async fn check(plan: CheckPlan) -> anyhow::Result<ExitCode> {
    let CheckPlan { cfg, hosts, source, output, quiet } = plan;
    let total = hosts.len();

    if !quiet {
        print_plan(&cfg, total, &source);
    }

    let sweep = Sweep::new(&cfg).await?;
    if !quiet {
        print::print_status(format!("Login method: {}", sweep.strategy()));
        mprint!();
        print::header("checking servers", quiet);
    }

    let span = if quiet {
        Span::none()
    } else {
        info_span!("sweep", indicatif.pb_show = true)
    };
    spinner::start_sweep_spinner(&span, total);

    let progress_span = span.clone();
    let on_progress: ProgressCallback = Box::new(move |event: &ProgressEvent| {
        spinner::report_sweep_progress(&progress_span, event, quiet);
    });

    let start_time = Instant::now();
    let records = sweep
        .run(hosts, Some(on_progress))
        .instrument(span.clone())
        .await?;
    drop(span);

    let total_time = start_time.elapsed();
    sweep_ends(&records, total_time, output, quiet)?;

    if report::all_reachable(&records) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_plan(cfg: &Config, total: usize, source: &str) {
    print::banner(false);
    info!("Loaded {} servers from {}", total, source);

    match (&cfg.auth.username, cfg.auth.mode) {
        (Some(user), AuthMode::PasswordViaHelper) => {
            print::print_status(format!("Testing SSH password login as {}", user.color(colors::PRIMARY)))
        }
        (Some(user), AuthMode::KeyBased) => {
            print::print_status(format!("Testing SSH key login as {}", user.color(colors::PRIMARY)))
        }
        (None, _) => print::print_status("Testing SSH key login as the current user"),
    }
    print::print_status(format!(
        "Timeout: {}s, max concurrent connections: {}",
        cfg.timeout.as_secs(),
        cfg.max_parallelism
    ));
}

fn sweep_ends(
    records: &[OutcomeRecord],
    total_time: Duration,
    output: Option<PathBuf>,
    quiet: bool,
) -> anyhow::Result<()> {
    if !quiet {
        mprint!();
    }

    match output {
        Some(path) => {
            report::write(records, &path)?;
            success!("Detailed report saved to: {}", path.display());
        }
        None => {
            print::header("connectivity report", quiet);
            for line in report::render(records, chrono::Local::now()).lines() {
                print::print(line);
            }
        }
    }

    print_summary(records, total_time, quiet);
    Ok(())
}

fn print_summary(records: &[OutcomeRecord], total_time: Duration, quiet: bool) {
    if quiet {
        return;
    }

    let ok = report::count(records, ProbeStatus::Success);
    let logged_in: ColoredString = format!("{ok}/{} logged in", records.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("Check complete: {logged_in} in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());

    if !report::all_reachable(records) {
        warn!("Some servers could not be reached over SSH");
    }
}
