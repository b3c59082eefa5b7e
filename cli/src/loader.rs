//! Host list loading from `.txt`, `.csv` and `.xlsx`/`.xls` files.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use sshprobe_common::network::target::{self, HostTarget};
use tracing::{debug, warn};

const HEADER_NAMES: &[&str] = &[
    "host", "hosts", "hostname", "hostnames", "server", "servers", "servername", "fqdn", "name",
    "address",
];

/// A spreadsheet column whose header contains one of these holds the hosts.
const HOST_COLUMN_HINTS: &[&str] = &["host", "server", "fqdn"];

pub fn load_hosts(path: &Path) -> anyhow::Result<Vec<HostTarget>> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raw: Vec<String> = match ext.as_str() {
        "txt" | "" => from_text(&read_text(path)?),
        "csv" => from_csv(&read_text(path)?)?,
        "xlsx" | "xls" => from_workbook(path)?,
        other => bail!("Unsupported file format: .{other}. Supported formats: .txt, .csv, .xlsx, .xls"),
    };

    let hosts = target::clean(&raw);
    debug!(file = %path.display(), entries = raw.len(), hosts = hosts.len(), "host list loaded");

    if hosts.is_empty() {
        bail!("No valid server names found in {}", path.display());
    }
    Ok(hosts)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn from_text(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}

/// First column of every row. A leading row that names the column is dropped.
fn from_csv(content: &str) -> anyhow::Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut cells: Vec<String> = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping unreadable CSV row {}: {}", row + 1, e);
                continue;
            }
        };
        let Some(first) = record.get(0) else { continue };
        if cells.is_empty() && is_header(first) {
            continue;
        }
        cells.push(first.to_string());
    }
    Ok(cells)
}

/// Reads the first worksheet. Its first row is always the header row.
fn from_workbook(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("workbook {} has no worksheets", path.display()))?
        .with_context(|| format!("failed to read first worksheet of {}", path.display()))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(from_rows(&rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Cells of the host column below the header row, blanks dropped.
fn from_rows(rows: &[Vec<String>]) -> Vec<String> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let column = host_column(header);
    let name = header.get(column).map(String::as_str).unwrap_or_default();
    debug!(column, header = name, "spreadsheet host column");

    body.iter()
        .filter_map(|row| row.get(column))
        .filter(|cell| !cell.is_empty())
        .cloned()
        .collect()
}

/// First header naming a host, server or fqdn column, else the first column.
fn host_column(header: &[String]) -> usize {
    header
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            HOST_COLUMN_HINTS.iter().any(|hint| name.contains(hint))
        })
        .unwrap_or(0)
}

fn is_header(cell: &str) -> bool {
    let normalized: String = cell
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_ascii_lowercase();
    HEADER_NAMES.contains(&normalized.as_str())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
