//! In-memory `ObjectStore` used by the test suites.
//!
//! Objects keep insertion order (overwrites stay in place, as an S3 key
//! would). ETags are the quoted MD5 of the body, like a single-part S3
//! upload. Every list and delete call is recorded so tests can assert on
//! exactly what a sweep asked the backend to do.

use crate::{
    models::object::ObjectEntry,
    services::storage_service::{ObjectStore, StorageError, StorageResult},
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

struct StoredObject {
    key: String,
    etag: String,
    last_modified: DateTime<Utc>,
}

pub struct MemoryStore {
    bucket: String,
    objects: Mutex<Vec<StoredObject>>,
    list_calls: AtomicUsize,
    delete_calls: Mutex<Vec<String>>,
    failing_key: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            delete_calls: Mutex::new(Vec::new()),
            failing_key: Mutex::new(None),
        }
    }

    /// Store `body` under `key`, replacing any existing object in place.
    pub fn put(&self, key: &str, body: impl Into<Bytes>, last_modified: DateTime<Utc>) {
        let body = body.into();
        let etag = format!("\"{:x}\"", md5::compute(&body));
        let mut objects = self.objects.lock().unwrap();
        let stored = StoredObject {
            key: key.to_string(),
            etag,
            last_modified,
        };
        match objects.iter_mut().find(|o| o.key == key) {
            Some(existing) => *existing = stored,
            None => objects.push(stored),
        }
    }

    /// Make every delete of `key` fail with a storage error.
    pub fn fail_deletes_of(&self, key: &str) {
        *self.failing_key.lock().unwrap() = Some(key.to_string());
    }

    pub fn keys(&self) -> Vec<String> {
        let objects = self.objects.lock().unwrap();
        objects.iter().map(|o| o.key.clone()).collect()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Keys passed to `delete_object`, in call order, including failed calls.
    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.delete_calls().len()
    }

    fn ensure_bucket(&self, bucket: &str) -> Result<(), String> {
        if bucket == self.bucket {
            Ok(())
        } else {
            Err(format!("NoSuchBucket: {bucket}"))
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<ObjectEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_bucket(bucket)
            .map_err(|message| StorageError::List {
                bucket: bucket.to_string(),
                message,
            })?;

        let objects = self.objects.lock().unwrap();
        Ok(objects
            .iter()
            .map(|o| ObjectEntry::new(&o.key, Some(o.etag.clone()), Some(o.last_modified)))
            .collect())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.delete_calls.lock().unwrap().push(key.to_string());
        let delete_err = |message: String| StorageError::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };

        self.ensure_bucket(bucket).map_err(delete_err)?;
        if self.failing_key.lock().unwrap().as_deref() == Some(key) {
            return Err(delete_err("InternalError: injected failure".into()));
        }

        // S3 deletes of missing keys succeed.
        self.objects.lock().unwrap().retain(|o| o.key != key);
        Ok(())
    }
}
