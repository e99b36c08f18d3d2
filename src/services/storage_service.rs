//! src/services/storage_service.rs
//!
//! Storage access for the sweeps: the `ObjectStore` capability trait and the
//! `R2Store` implementation backed by `aws-sdk-s3`. Request signing, HTTP
//! transport and the SDK's own retry defaults live inside the client; this
//! layer only lists and deletes.

use crate::{config::AppConfig, models::object::ObjectEntry};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    error::DisplayErrorContext,
    primitives::DateTime as SmithyDateTime,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("listing bucket `{bucket}` failed: {message}")]
    List { bucket: String, message: String },
    #[error("deleting `{key}` from bucket `{bucket}` failed: {message}")]
    Delete {
        bucket: String,
        key: String,
        message: String,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The two storage capabilities a cleanup run consumes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Return every object in `bucket`, in backend order.
    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<ObjectEntry>>;

    /// Delete a single object. One attempt; failures are returned as-is.
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<ObjectEntry>> {
        (**self).list_objects(bucket).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        (**self).delete_object(bucket, key).await
    }
}

/// S3-compatible store pointed at Cloudflare R2 (or any `--endpoint`).
///
/// Constructed once per run and shared by both sweeps.
#[derive(Clone, Debug)]
pub struct R2Store {
    client: aws_sdk_s3::Client,
}

impl R2Store {
    /// Build the client from static credentials. No network I/O happens here.
    pub fn connect(config: &AppConfig) -> StorageResult<Self> {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.access_key_secret.clone(),
            None,
            None,
            "bucket-janitor-env",
        );

        let endpoint = config.endpoint();
        debug!(%endpoint, region = %config.region, "building storage client");

        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl ObjectStore for R2Store {
    /// Follows `ListObjectsV2` continuation tokens until the listing is
    /// complete, so callers always see the whole bucket.
    #[instrument(skip(self))]
    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<ObjectEntry>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut entries = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| StorageError::List {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

            for object in page.contents() {
                match entry_from_s3(object) {
                    Some(entry) => entries.push(entry),
                    None => warn!("listing returned an object without a key, ignoring it"),
                }
            }
        }

        debug!(count = entries.len(), "listed bucket");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| StorageError::Delete {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;
        Ok(())
    }
}

/// Convert an SDK listing record. Returns None for records without a key.
fn entry_from_s3(object: &aws_sdk_s3::types::Object) -> Option<ObjectEntry> {
    let key = object.key()?;
    Some(ObjectEntry::new(
        key,
        object.e_tag().map(str::to_string),
        object.last_modified().and_then(to_chrono),
    ))
}

fn to_chrono(ts: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::types::Object;
    use chrono::TimeZone;

    #[test]
    fn test_entry_from_s3_copies_listing_fields() {
        let object = Object::builder()
            .key("backups/db-01.sql")
            .e_tag("\"9e107d9d372bb6826bd81d3542a419d6\"")
            .last_modified(SmithyDateTime::from_secs(1_736_510_400))
            .build();

        let entry = entry_from_s3(&object).unwrap();
        assert_eq!(entry.key, "backups/db-01.sql");
        assert_eq!(
            entry.etag.as_deref(),
            Some("\"9e107d9d372bb6826bd81d3542a419d6\"")
        );
        assert_eq!(
            entry.last_modified,
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_entry_from_s3_without_key_is_dropped() {
        let object = Object::builder().e_tag("\"abc\"").build();
        assert!(entry_from_s3(&object).is_none());
    }

    #[test]
    fn test_entry_from_s3_tolerates_missing_metadata() {
        let object = Object::builder().key("a").build();
        let entry = entry_from_s3(&object).unwrap();
        assert_eq!(entry, ObjectEntry::new("a", None, None));
    }

    #[test]
    fn test_to_chrono_keeps_subsecond_precision() {
        let ts = SmithyDateTime::from_secs_and_nanos(1_736_510_400, 250_000_000);
        let converted = to_chrono(&ts).unwrap();
        assert_eq!(converted.timestamp(), 1_736_510_400);
        assert_eq!(converted.timestamp_subsec_millis(), 250);
    }
}
