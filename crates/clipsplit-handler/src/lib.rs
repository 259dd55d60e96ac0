//! Clipsplit Handler
//!
//! Invocation adapter for the audio split pipeline: loads configuration,
//! initializes logging, verifies the media toolchain, wires storage and
//! extractor into the orchestrator, and turns a raw event payload into the
//! response handed back to the invoking runtime.

pub mod invocation;
pub mod setup;
pub mod telemetry;

pub use invocation::handle_payload;
pub use setup::{build_orchestrator, build_orchestrator_with_storage, verify_toolchain};
pub use telemetry::init_telemetry;
