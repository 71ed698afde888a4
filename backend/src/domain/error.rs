//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};

use crate::domain::TraceId;

/// HTTP header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The request breaks a business rule such as email uniqueness.
    Conflict,
    /// The backing store failed; callers see a generic message only.
    StoreUnavailable,
    /// An unexpected failure outside the domain (framework, serialisation).
    InternalError,
}

/// A single field-level validation failure.
///
/// # Examples
/// ```
/// use orgdirectory::domain::FieldError;
///
/// let error = FieldError::new("name", "Organization name is required");
/// assert_eq!(error.field(), "name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    field: String,
    message: String,
}

impl FieldError {
    /// Create a field error for `field` with a human-readable message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending input field.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Human-readable reason the field was rejected.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Domain error payload.
///
/// The trace identifier in scope at construction time is captured so that
/// adapters can echo it back to clients.
///
/// # Examples
/// ```
/// use orgdirectory::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Organization not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert!(err.field_errors().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    field_errors: Vec<FieldError>,
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: Vec::new(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Field-level validation failures, empty unless validation failed.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Trace identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach field-level validation failures.
    pub fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        self.field_errors = field_errors;
        self
    }

    /// Override the trace identifier.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Validation failure carrying every rejected field.
    ///
    /// # Examples
    /// ```
    /// use orgdirectory::domain::{Error, FieldError};
    ///
    /// let err = Error::validation_failed(vec![FieldError::new("email", "bad")]);
    /// assert_eq!(err.message(), "Validation failed");
    /// assert_eq!(err.field_errors().len(), 1);
    /// ```
    pub fn validation_failed(field_errors: Vec<FieldError>) -> Self {
        Self::invalid_request("Validation failed").with_field_errors(field_errors)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::StoreUnavailable`].
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(Error::not_found("missing"), ErrorCode::NotFound)]
    #[case(Error::conflict("taken"), ErrorCode::Conflict)]
    #[case(Error::store_unavailable("down"), ErrorCode::StoreUnavailable)]
    #[case(Error::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn display_uses_message() {
        let error = Error::conflict("Email already exists");
        assert_eq!(error.to_string(), "Email already exists");
    }

    #[rstest]
    fn validation_failed_keeps_field_order() {
        let error = Error::validation_failed(vec![
            FieldError::new("name", "User name is required"),
            FieldError::new("email", "Please provide a valid email address"),
        ]);
        let fields: Vec<_> = error.field_errors().iter().map(FieldError::field).collect();
        assert_eq!(fields, vec!["name", "email"]);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id = TraceId::from_uuid(Uuid::new_v4());
        let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
        assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
    }

    #[tokio::test]
    async fn trace_id_absent_out_of_scope() {
        assert!(Error::not_found("missing").trace_id().is_none());
    }

    #[rstest]
    fn error_code_serialises_snake_case() {
        let value = serde_json::to_value(ErrorCode::StoreUnavailable).expect("serialise code");
        assert_eq!(value, serde_json::json!("store_unavailable"));
    }
}
