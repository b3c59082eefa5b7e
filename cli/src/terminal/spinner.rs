use colored::*;
use indicatif::ProgressStyle;
use sshprobe_common::network::status::ProbeStatus;
use sshprobe_core::scanner::ProgressEvent;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::{colors, print};

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

/// Attaches the sweep spinner to `span` and primes its message.
pub fn start_sweep_spinner(span: &Span, total: usize) {
    span.pb_set_style(&style());
    span.pb_set_length(total as u64);
    span.pb_set_message(&waiting_message(0, total));
}

/// Prints one completed host above the spinner and bumps the counter.
pub fn report_sweep_progress(span: &Span, event: &ProgressEvent, quiet: bool) {
    if quiet {
        return;
    }
    print::print(&progress_line(event));
    span.pb_inc(1);
    span.pb_set_message(&waiting_message(event.index, event.total));
}

fn waiting_message(done: usize, total: usize) -> String {
    format!(
        "Checked {} of {} hosts...",
        done.to_string().green().bold(),
        total.to_string().color(colors::ACCENT)
    )
}

pub fn status_symbol(status: ProbeStatus) -> ColoredString {
    match status {
        ProbeStatus::Success => "✓".green().bold(),
        ProbeStatus::AuthFailed => "⚠".yellow().bold(),
        ProbeStatus::Timeout => "⏱".yellow(),
        ProbeStatus::DnsFailed
        | ProbeStatus::PortClosed
        | ProbeStatus::SshFailed
        | ProbeStatus::SshError
        | ProbeStatus::Error => "✗".red().bold(),
    }
}

fn status_label(status: ProbeStatus) -> ColoredString {
    let label = format!("{:<12}", status);
    match status {
        ProbeStatus::Success => label.green(),
        ProbeStatus::AuthFailed | ProbeStatus::Timeout => label.yellow(),
        _ => label.red(),
    }
}

/// `✓ [  3/10] web01.example.com            SUCCESS      (0.42s)`
pub fn progress_line(event: &ProgressEvent) -> String {
    let width = event.total.to_string().len();
    format!(
        "{} {}{:>width$}/{}{} {:<30} {} {}",
        status_symbol(event.status),
        "[".color(colors::SEPARATOR),
        event.index,
        event.total,
        "]".color(colors::SEPARATOR),
        event.hostname,
        status_label(event.status),
        format!("({:.2}s)", event.elapsed.as_secs_f64()).color(colors::SEPARATOR),
        width = width.max(3),
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
