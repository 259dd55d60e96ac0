//! In-memory storage gateway for testing

use async_trait::async_trait;
use clipsplit_core::StorageBackend;
use clipsplit_storage::{ObjectStorage, StorageError, StorageOperation, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One call observed by [`MockStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Get {
        bucket: String,
        key: String,
    },
    Put {
        bucket: String,
        key: String,
        content_type: String,
        size: usize,
    },
    Copy {
        bucket: String,
        source_key: String,
        dest_key: String,
    },
    Delete {
        bucket: String,
        key: String,
    },
}

impl StorageCall {
    pub fn operation(&self) -> StorageOperation {
        match self {
            StorageCall::Get { .. } => StorageOperation::Get,
            StorageCall::Put { .. } => StorageOperation::Put,
            StorageCall::Copy { .. } => StorageOperation::Copy,
            StorageCall::Delete { .. } => StorageOperation::Delete,
        }
    }
}

/// Failure injected into a storage operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    NotFound,
    AccessDenied,
    QuotaExceeded,
}

impl InjectedFailure {
    fn into_error(self, key: &str) -> StorageError {
        match self {
            InjectedFailure::NotFound => StorageError::NotFound(key.to_string()),
            InjectedFailure::AccessDenied => StorageError::AccessDenied(key.to_string()),
            InjectedFailure::QuotaExceeded => StorageError::QuotaExceeded(key.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: Option<String>,
}

/// Mock storage that keeps objects in memory
///
/// Every call is recorded (including failed ones) so tests can assert on the
/// exact sequence of storage operations.
#[derive(Clone, Default)]
#[allow(clippy::type_complexity)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    calls: Arc<Mutex<Vec<StorageCall>>>,
    failures: Arc<Mutex<HashMap<StorageOperation, InjectedFailure>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a call.
    pub fn with_object(self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) -> Self {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data: data.into(),
                content_type: None,
            },
        );
        self
    }

    /// Make every subsequent call of `operation` fail.
    pub fn fail_on(self, operation: StorageOperation, failure: InjectedFailure) -> Self {
        self.failures.lock().unwrap().insert(operation, failure);
        self
    }

    pub fn has_object(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.data.clone())
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .and_then(|o| o.content_type.clone())
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, operation: StorageOperation) -> Vec<StorageCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation() == operation)
            .collect()
    }

    /// Operations in call order.
    pub fn operations(&self) -> Vec<StorageOperation> {
        self.calls().iter().map(StorageCall::operation).collect()
    }

    fn record(&self, call: StorageCall) -> StorageResult<()> {
        let operation = call.operation();
        let key = match &call {
            StorageCall::Get { key, .. }
            | StorageCall::Put { key, .. }
            | StorageCall::Delete { key, .. } => key.clone(),
            StorageCall::Copy { source_key, .. } => source_key.clone(),
        };
        self.calls.lock().unwrap().push(call);

        match self.failures.lock().unwrap().get(&operation) {
            Some(failure) => Err(failure.into_error(&key)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.record(StorageCall::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;

        self.object(bucket, key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.record(StorageCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
        })?;

        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        dest_key: &str,
    ) -> StorageResult<()> {
        self.record(StorageCall::Copy {
            bucket: bucket.to_string(),
            source_key: source_key.to_string(),
            dest_key: dest_key.to_string(),
        })?;

        let mut objects = self.objects.lock().unwrap();
        let source = objects
            .get(&(bucket.to_string(), source_key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(source_key.to_string()))?;
        objects.insert((bucket.to_string(), dest_key.to_string()), source);
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.record(StorageCall::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;

        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
