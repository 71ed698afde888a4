//! Organization directory backend.
//!
//! Hexagonal layout: [`domain`] holds entities, validation and use cases;
//! [`inbound`] exposes them over HTTP; [`outbound`] stores them in PostgreSQL
//! or in memory. [`sample_data`] seeds an empty store and [`settings`] loads
//! runtime configuration.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod sample_data;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
