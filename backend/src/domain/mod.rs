//! Domain primitives, aggregates and services.
//!
//! Purpose: define the organization directory's entities, validation rules
//! and use cases independently of HTTP and SQL. Adapters depend on this
//! module; it depends on nothing outside the crate's domain.
//!
//! Public surface:
//! - Error / ErrorCode / FieldError: transport-agnostic failures.
//! - Organization and User aggregates with their validated drafts.
//! - OrganizationService, UserService, DirectoryStatsService: implementations
//!   of the driving ports in [`ports`].

pub mod error;
pub mod organization;
mod organization_service;
pub mod ports;
pub mod stats;
pub mod trace_id;
pub mod user;
mod user_service;
pub mod validation;

pub use self::error::{Error, ErrorCode, FieldError, TRACE_ID_HEADER};
pub use self::organization::{
    ORGANIZATION_NAME_MAX, Organization, OrganizationAddress, OrganizationDeletion,
    OrganizationDraft, OrganizationId, OrganizationInput, OrganizationName,
    OrganizationValidationError, OrganizationWithUsers, UserSummary,
};
pub use self::organization_service::OrganizationService;
pub use self::stats::{DirectoryStats, DirectoryStatsService};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, OrganizationSummary, Role, USER_NAME_MAX, User, UserDraft, UserId, UserInput,
    UserName, UserValidationError, UserWithOrganization,
};
pub use self::user_service::UserService;
