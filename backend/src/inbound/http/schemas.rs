//! OpenAPI-only schema definitions.
//!
//! Envelopes without a payload have no runtime counterpart that derives
//! `ToSchema` (`ApiEnvelope<()>` carries no schema for `()`), so the shape is
//! spelled out here for documentation.

use utoipa::ToSchema;

use super::envelope::{ApiStatus, FieldErrorBody};

/// Envelope returned for confirmations without data and for every failure.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageEnvelopeSchema {
    #[schema(example = "error")]
    status: ApiStatus,
    #[schema(example = "Organization not found")]
    message: String,
    /// Present only when input validation failed.
    errors: Option<Vec<FieldErrorBody>>,
}
