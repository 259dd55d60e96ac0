//! Clipsplit Core Library
//!
//! This crate provides the domain models, error taxonomy and configuration
//! shared by the storage, processing and handler crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{FailureCategory, LogLevel};
pub use models::{EventError, InvocationResponse, PipelineResult, TriggerEvent};
pub use storage_types::StorageBackend;
