//! Raw payload → invocation response

use clipsplit_core::{FailureCategory, InvocationResponse, PipelineResult};
use clipsplit_processing::AudioSplitOrchestrator;
use serde_json::Value;

/// Run one invocation for a raw JSON payload.
///
/// A payload that is not JSON at all is reported like any other malformed
/// event.
pub async fn handle_payload(
    orchestrator: &AudioSplitOrchestrator,
    payload: &str,
) -> InvocationResponse {
    let event: Value = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Event payload is not valid JSON");
            return PipelineResult::failure(FailureCategory::MalformedEvent).into_response();
        }
    };

    orchestrator.handle_event(&event).await.into_response()
}
