//! Outcome records for a cleanup run.

use serde::Serialize;
use uuid::Uuid;

/// Which sweep produced a report.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    Duplicates,
    Expired,
}

/// What a single sweep saw and did.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SweepReport {
    pub sweep: SweepKind,

    /// Number of entries in the listing the sweep worked on.
    pub listed: usize,

    /// Keys deleted, in deletion order. In dry-run mode, the keys that would
    /// have been deleted.
    pub deleted: Vec<String>,

    /// Set when the sweep was gated off and did not evaluate any entry.
    pub skipped: bool,

    pub dry_run: bool,
}

impl SweepReport {
    pub fn new(sweep: SweepKind, listed: usize, dry_run: bool) -> Self {
        Self {
            sweep,
            listed,
            deleted: Vec::new(),
            skipped: false,
            dry_run,
        }
    }
}

/// Summary of a whole run, printed with `--json`.
#[derive(Serialize, Clone, Debug)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub bucket: String,
    pub duplicates: SweepReport,
    pub expired: SweepReport,
    pub heartbeat_sent: bool,
}

impl RunSummary {
    pub fn total_deleted(&self) -> usize {
        self.duplicates.deleted.len() + self.expired.deleted.len()
    }
}
