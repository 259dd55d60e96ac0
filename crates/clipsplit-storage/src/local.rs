use crate::traits::{ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`. Content types are not
/// persisted.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory holding one sub-directory per bucket
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert bucket and key to a filesystem path with security validation
    ///
    /// Rejects anything that could escape the base directory: parent
    /// components, absolute paths, and empty segments.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_segment(bucket, "bucket")?;

        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(format!(
                "Storage key is not a relative object key: {}",
                key
            )));
        }

        let relative = Path::new(key);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid path components: {}",
                key
            )));
        }

        Ok(self.base_path.join(bucket).join(relative))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| map_io_error(e, path))?;
        }
        Ok(())
    }
}

fn validate_segment(value: &str, what: &str) -> StorageResult<()> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid {} name: {}",
            what, value
        )));
    }
    Ok(())
}

/// Translate filesystem errors into the gateway's error contract.
fn map_io_error(err: std::io::Error, path: &Path) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
        ErrorKind::PermissionDenied => StorageError::AccessDenied(path.display().to_string()),
        _ => StorageError::IoError(err),
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        let start = std::time::Instant::now();

        let data = fs::read(&path).await.map_err(|e| map_io_error(e, &path))?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = data.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local get_object successful"
        );

        Ok(data)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| map_io_error(e, &path))?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local put_object successful"
        );

        Ok(())
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        dest_key: &str,
    ) -> StorageResult<()> {
        let from = self.object_path(bucket, source_key)?;
        let to = self.object_path(bucket, dest_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&from).await.map_err(|e| map_io_error(e, &from))? {
            return Err(StorageError::NotFound(from.display().to_string()));
        }

        self.ensure_parent_dir(&to).await?;

        fs::copy(&from, &to).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => map_io_error(e, &from),
            _ => StorageError::CopyFailed(format!(
                "Failed to copy {} to {}: {}",
                from.display(),
                to.display(),
                e
            )),
        })?;

        tracing::info!(
            bucket = %bucket,
            from_key = %source_key,
            to_key = %dest_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local copy_object successful"
        );

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;

        fs::remove_file(&path)
            .await
            .map_err(|e| map_io_error(e, &path))?;

        tracing::info!(bucket = %bucket, key = %key, "Local delete_object successful");

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
