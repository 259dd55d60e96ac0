//! Pipeline outcome and the response handed back to the invoking runtime.

use crate::error::FailureCategory;
use serde::{Deserialize, Serialize};

/// Outcome of one invocation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Success {
        message: String,
    },
    Failure {
        category: FailureCategory,
        message: String,
    },
}

impl PipelineResult {
    pub fn success(message: impl Into<String>) -> Self {
        PipelineResult::Success {
            message: message.into(),
        }
    }

    /// Failure carrying the category's generic client message.
    pub fn failure(category: FailureCategory) -> Self {
        PipelineResult::Failure {
            category,
            message: category.client_message().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            PipelineResult::Success { .. } => None,
            PipelineResult::Failure { category, .. } => Some(*category),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            PipelineResult::Success { message } | PipelineResult::Failure { message, .. } => {
                message
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PipelineResult::Success { .. } => 200,
            PipelineResult::Failure { category, .. } => category.status_code(),
        }
    }

    pub fn into_response(self) -> InvocationResponse {
        InvocationResponse::new(self.status_code(), self.message())
    }
}

impl From<PipelineResult> for InvocationResponse {
    fn from(result: PipelineResult) -> Self {
        result.into_response()
    }
}

/// Response shape expected by the invoking runtime.
///
/// `body` is itself a JSON document of the form `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::json!({ "message": message }).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn success_maps_to_200() {
        let response = PipelineResult::success("done").into_response();
        assert_eq!(response.status_code, 200);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], "done");
    }

    #[test]
    fn failure_uses_category_message_and_status() {
        let result = PipelineResult::failure(FailureCategory::MalformedEvent);
        assert_eq!(result.category(), Some(FailureCategory::MalformedEvent));
        assert_eq!(result.status_code(), 400);
        assert_eq!(result.message(), "Error processing event. Key not found.");
    }

    #[test]
    fn response_serializes_with_runtime_field_names() {
        let response: InvocationResponse =
            PipelineResult::failure(FailureCategory::StorageError).into();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 500);
        assert!(value["body"].is_string());
        let body: Value = serde_json::from_str(value["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["message"], "Error interacting with storage.");
    }
}
