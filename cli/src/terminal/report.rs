//! Plain-text connectivity report.
//!
//! The same text goes to stdout or to the `--output` file, so nothing here
//! emits colour codes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};
use sshprobe_common::network::outcome::{OutcomeRecord, TIMESTAMP_FORMAT};
use sshprobe_common::network::status::ProbeStatus;

const RULE_WIDTH: usize = 80;
const TITLE_WIDTH: usize = 50;
const ERROR_PREVIEW_CHARS: usize = 40;

pub fn render(records: &[OutcomeRecord], generated: DateTime<Local>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("SERVER CONNECTIVITY REPORT".to_string());
    lines.push("=".repeat(TITLE_WIDTH));
    lines.push(format!("Generated: {}", generated.format(TIMESTAMP_FORMAT)));
    lines.push(format!("Total servers checked: {}", records.len()));
    lines.push(String::new());

    lines.push("SUMMARY:".to_string());
    let total = records.len().max(1) as f64;
    for (status, count) in summarize(records) {
        let percent = count as f64 / total * 100.0;
        lines.push(format!("  {:<12}: {:>3} ({:>5.1}%)", status, count, percent));
    }
    lines.push(String::new());

    lines.push("DETAILED RESULTS:".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!("{:<30} {:<12} {:<8} {}", "Hostname", "Status", "Time(s)", "Error"));
    lines.push("-".repeat(RULE_WIDTH));

    for record in sorted(records) {
        lines.push(format!(
            "{:<30} {:<12} {:<8.2} {}",
            record.hostname,
            record.status,
            record.elapsed_secs(),
            preview(&record.error)
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn write(records: &[OutcomeRecord], path: &Path) -> anyhow::Result<()> {
    let text = render(records, Local::now());
    fs::write(path, text).with_context(|| format!("failed to write report to {}", path.display()))
}

/// Counts per status, only for statuses that occurred, ordered by name.
fn summarize(records: &[OutcomeRecord]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.status.as_str()).or_default() += 1;
    }
    counts
}

fn sorted(records: &[OutcomeRecord]) -> Vec<&OutcomeRecord> {
    let mut rows: Vec<&OutcomeRecord> = records.iter().collect();
    rows.sort_by(|a, b| {
        a.status
            .as_str()
            .cmp(b.status.as_str())
            .then_with(|| a.hostname.cmp(&b.hostname))
    });
    rows
}

fn preview(error: &str) -> String {
    if error.chars().count() <= ERROR_PREVIEW_CHARS {
        return error.to_string();
    }
    let head: String = error.chars().take(ERROR_PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// True when every host either logged in or at least answered on SSH.
pub fn all_reachable(records: &[OutcomeRecord]) -> bool {
    records.iter().all(|r| r.status.is_reachable())
}

pub fn count(records: &[OutcomeRecord], status: ProbeStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
