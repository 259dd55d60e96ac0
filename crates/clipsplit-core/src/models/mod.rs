//! Domain models

pub mod event;
pub mod result;

pub use event::{decode_object_key, EventError, TriggerEvent};
pub use result::{InvocationResponse, PipelineResult};
