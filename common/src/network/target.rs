//! # Probe Target Model
//!
//! A host to probe is just a name or address as the operator wrote it. The
//! resolver decides later whether it means anything.
//!
//! Parsing only strips whitespace and rejects entries that can never be a host:
//! * empty strings
//! * comment lines starting with `#`

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostTarget(String);

impl HostTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for HostTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for HostTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("host cannot be empty".to_string());
        }
        if trimmed.starts_with('#') {
            return Err(format!("not a host (comment): {trimmed}"));
        }

        Ok(Self(trimmed.to_string()))
    }
}

/// Parses a comma-separated list of hosts (e.g. `"web01, 10.0.0.7,db.internal"`).
///
/// Blank items are skipped, duplicates are kept in order.
pub fn parse_commas(s: &str) -> Result<Vec<HostTarget>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(HostTarget::from_str)
        .collect()
}

/// Keeps the entries of a raw list that are hosts, dropping blanks and comments.
pub fn clean<I, S>(entries: I) -> Vec<HostTarget>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|entry| entry.as_ref().parse().ok())
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
