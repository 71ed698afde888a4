//! Response envelope shared by every directory endpoint.
//!
//! ```json
//! { "status": "success", "message": "User created successfully", "data": { } }
//! { "status": "error", "message": "Validation failed", "errors": [{ "field": "email", "message": "…" }] }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::FieldError;

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorBody {
    #[schema(example = "email")]
    pub field: String,
    #[schema(example = "Please provide a valid email address")]
    pub message: String,
}

impl From<&FieldError> for FieldErrorBody {
    fn from(value: &FieldError) -> Self {
        Self {
            field: value.field().to_owned(),
            message: value.message().to_owned(),
        }
    }
}

/// Uniform JSON body: `status` always, the rest only when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiEnvelope<T> {
    pub status: ApiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldErrorBody>>,
}

impl<T> ApiEnvelope<T> {
    /// Successful read carrying `data` only.
    pub fn data(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    /// Successful mutation carrying a confirmation message and the record.
    pub fn confirmed(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiEnvelope<()> {
    /// Successful mutation with nothing to return.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Success,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    /// Failure body; `errors` is omitted when `field_errors` is empty.
    pub fn error(message: impl Into<String>, field_errors: &[FieldError]) -> Self {
        let errors = (!field_errors.is_empty())
            .then(|| field_errors.iter().map(FieldErrorBody::from).collect());
        Self {
            status: ApiStatus::Error,
            message: Some(message.into()),
            data: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn success_omits_absent_members() {
        let value = serde_json::to_value(ApiEnvelope::data(vec![1, 2])).expect("serialise");
        assert_eq!(value, json!({ "status": "success", "data": [1, 2] }));
    }

    #[rstest]
    fn confirmation_carries_message_and_data() {
        let value = serde_json::to_value(ApiEnvelope::confirmed("User created successfully", 7))
            .expect("serialise");
        assert_eq!(
            value,
            json!({ "status": "success", "message": "User created successfully", "data": 7 })
        );
    }

    #[rstest]
    fn error_lists_field_errors() {
        let envelope = ApiEnvelope::error(
            "Validation failed",
            &[FieldError::new("name", "User name is required")],
        );
        let value = serde_json::to_value(envelope).expect("serialise");
        assert_eq!(
            value,
            json!({
                "status": "error",
                "message": "Validation failed",
                "errors": [{ "field": "name", "message": "User name is required" }]
            })
        );
    }

    #[rstest]
    fn error_without_fields_has_no_errors_member() {
        let value =
            serde_json::to_value(ApiEnvelope::error("User not found", &[])).expect("serialise");
        assert_eq!(value, json!({ "status": "error", "message": "User not found" }));
    }
}
