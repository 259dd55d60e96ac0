//! Clipsplit Storage Library
//!
//! This crate provides the storage gateway used by the audio split pipeline:
//! the [`ObjectStorage`] trait with S3 and local filesystem implementations,
//! and the key deriver that defines where split outputs land.
//!
//! # Output key layout
//!
//! For a source object whose file stem is `{base}`:
//!
//! - **Audio**: `data/{base}/audio.mp3`
//! - **Video**: `data/{base}/video.mp4`
//!
//! Downstream consumers depend on this layout. Key generation is centralized
//! in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use clipsplit_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{base_name, derive_keys, is_derived_key, ObjectKeySet};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageOperation, StorageResult};
