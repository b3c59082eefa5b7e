use std::sync::{Mutex, MutexGuard, PoisonError};

use sshprobe_common::network::outcome::OutcomeRecord;

/// Append-only collection of finished records shared by the workers of one run.
///
/// The lock is only held while a record is pushed, never while a probe is running.
#[derive(Debug, Default)]
pub struct ResultSet {
    records: Mutex<Vec<OutcomeRecord>>,
}

impl ResultSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Appends `record` and returns its 1-based completion index.
    pub fn push(&self, record: OutcomeRecord) -> usize {
        let mut records = self.lock();
        records.push(record);
        records.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_records(self) -> Vec<OutcomeRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the records out while other handles to the set may still exist.
    pub fn take(&self) -> Vec<OutcomeRecord> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OutcomeRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
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
