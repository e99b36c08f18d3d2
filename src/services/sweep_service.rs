//! src/services/sweep_service.rs
//!
//! SweepService — the two maintenance passes run against a bucket:
//! - duplicate sweep: deletes the first object whose ETag was already seen,
//!   then stops
//! - age sweep: when the bucket holds more than `MIN_OBJECTS_FOR_EXPIRY`
//!   objects, deletes everything last modified before the retention window
//!
//! Each sweep takes its own fresh listing. Storage errors are returned
//! immediately; nothing already deleted is rolled back.

use crate::{
    models::{
        object::ObjectEntry,
        report::{SweepKind, SweepReport},
    },
    services::storage_service::{ObjectStore, StorageResult},
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Objects last modified more than this many days ago are expired.
pub const RETENTION_DAYS: i64 = 3;

/// The age sweep only runs when the listing has more entries than this.
pub const MIN_OBJECTS_FOR_EXPIRY: usize = 7;

pub struct SweepService<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    bucket: &'a str,
    dry_run: bool,
}

impl<'a, S: ObjectStore + ?Sized> SweepService<'a, S> {
    pub fn new(store: &'a S, bucket: &'a str, dry_run: bool) -> Self {
        Self {
            store,
            bucket,
            dry_run,
        }
    }

    /// Delete the first duplicate found in a fresh listing.
    ///
    /// At most one object is deleted per call even when more duplicates
    /// exist; the rest are left for later runs.
    #[instrument(skip(self), fields(bucket = %self.bucket, dry_run = self.dry_run))]
    pub async fn remove_first_duplicate(&self) -> StorageResult<SweepReport> {
        let entries = self.store.list_objects(self.bucket).await?;
        let mut report = SweepReport::new(SweepKind::Duplicates, entries.len(), self.dry_run);

        if let Some(duplicate) = first_duplicate(&entries) {
            self.delete(&duplicate.key).await?;
            info!(key = %duplicate.key, "Duplicate content {}", duplicate.key);
            report.deleted.push(duplicate.key.clone());
        }

        Ok(report)
    }

    /// Delete every object modified before `now - RETENTION_DAYS`, provided
    /// a fresh listing holds more than `MIN_OBJECTS_FOR_EXPIRY` objects.
    ///
    /// The size gate covers the whole bucket: at or below it, nothing is
    /// deleted no matter how old.
    #[instrument(skip(self), fields(bucket = %self.bucket, dry_run = self.dry_run))]
    pub async fn remove_expired(&self, now: DateTime<Utc>) -> StorageResult<SweepReport> {
        let entries = self.store.list_objects(self.bucket).await?;
        let mut report = SweepReport::new(SweepKind::Expired, entries.len(), self.dry_run);

        if entries.len() <= MIN_OBJECTS_FOR_EXPIRY {
            info!(listed = entries.len(), "Not deleting anything");
            report.skipped = true;
            return Ok(report);
        }

        let threshold = retention_threshold(now);
        for entry in entries.iter().filter(|e| e.modified_before(threshold)) {
            self.delete(&entry.key).await?;
            info!(key = %entry.key, "Expired content deleted {}", entry.key);
            report.deleted.push(entry.key.clone());
        }

        Ok(report)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if self.dry_run {
            info!(key, "dry run, skipping delete");
            return Ok(());
        }
        self.store.delete_object(self.bucket, key).await
    }
}

/// Cutoff for the age sweep.
pub fn retention_threshold(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RETENTION_DAYS)
}

/// First entry, in listing order, whose ETag matches an earlier entry.
///
/// Entries without an ETag never match.
fn first_duplicate(entries: &[ObjectEntry]) -> Option<&ObjectEntry> {
    let mut seen = HashSet::new();
    entries.iter().find(|entry| match entry.etag.as_deref() {
        Some(etag) => !seen.insert(etag),
        None => false,
    })
}
