//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The four blob-store operations the pipeline performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOperation {
    Get,
    Put,
    Copy,
    Delete,
}

impl Display for StorageOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            StorageOperation::Get => "get",
            StorageOperation::Put => "put",
            StorageOperation::Copy => "copy",
            StorageOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Storage gateway trait
///
/// All storage backends (S3, local filesystem) implement this trait. Objects are
/// addressed by bucket and key. Implementations must be safe to share between
/// concurrent invocations; no transactional guarantee spans multiple calls.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch the full content of an object.
    ///
    /// Fails with `NotFound` or `AccessDenied`.
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Write an object, replacing any existing content at the key.
    ///
    /// Fails with `AccessDenied` or `QuotaExceeded`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Copy an object within a bucket.
    ///
    /// Fails with `NotFound` when the source is missing, or `AccessDenied`.
    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str)
        -> StorageResult<()>;

    /// Delete an object.
    ///
    /// `NotFound` may be reported; callers treat it as already deleted.
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
