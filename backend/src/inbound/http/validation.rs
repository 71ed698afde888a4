//! Request-shape helpers shared by the directory handlers.
//!
//! Body field validation belongs to the domain; this module only deals with
//! what must be settled before a domain call: JSON decoding failures and path
//! identifiers.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Error, OrganizationId, UserId};

/// Message returned when a body cannot be decoded as the expected JSON.
pub(crate) const INVALID_BODY_MESSAGE: &str = "Invalid request body";

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejecting undecodable request body");
    Error::invalid_request(INVALID_BODY_MESSAGE).into()
}

/// JSON extractor configuration answering malformed bodies with the envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Resolve an organization path segment, answering 404 when it cannot name a
/// stored record.
pub(crate) fn organization_path_id(raw: &str) -> Result<OrganizationId, Error> {
    OrganizationId::parse(raw).ok_or_else(|| Error::not_found("Organization not found"))
}

/// Resolve a user path segment, answering 404 when it cannot name a stored
/// record.
pub(crate) fn user_path_id(raw: &str) -> Result<UserId, Error> {
    UserId::parse(raw).ok_or_else(|| Error::not_found("User not found"))
}

/// Render a loosely typed JSON scalar as text for domain parsing.
///
/// Numbers and strings keep their literal form; `null` means absent. Any
/// other shape is passed through as JSON text so domain validation rejects it.
pub(crate) fn scalar_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}
