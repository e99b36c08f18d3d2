//! Represents one entry of a bucket listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single object as reported by a bucket listing.
///
/// Only the listing metadata is carried, never the content bytes. Entries are
/// produced fresh on every listing call and dropped when the sweep that asked
/// for them ends.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Opaque content fingerprint (S3 `ETag`, quotes included as returned).
    pub etag: Option<String>,

    /// Timestamp when the object was last modified.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectEntry {
    pub fn new(
        key: impl Into<String>,
        etag: Option<String>,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            key: key.into(),
            etag,
            last_modified,
        }
    }

    /// True when the object was last modified strictly before `threshold`.
    ///
    /// Objects without a timestamp are never considered older.
    pub fn modified_before(&self, threshold: DateTime<Utc>) -> bool {
        self.last_modified.is_some_and(|ts| ts < threshold)
    }
}
