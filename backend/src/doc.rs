//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every directory endpoint and the health probes.
//! Request and response bodies are inbound DTOs, so the domain stays free of
//! utoipa. The document backs Swagger UI in debug builds and is exported by
//! the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::envelope::{ApiStatus, FieldErrorBody};
use crate::inbound::http::organizations::{
    MemberBody, OrganizationBody, OrganizationRequest, OrganizationWithUsersBody,
};
use crate::inbound::http::schemas::MessageEnvelopeSchema;
use crate::inbound::http::stats::StatsBody;
use crate::inbound::http::users::{OrganizationSummaryBody, UserBody, UserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Organization directory API",
        description = "Administer organizations and the users that belong to them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::organizations::list_organizations,
        crate::inbound::http::organizations::get_organization,
        crate::inbound::http::organizations::create_organization,
        crate::inbound::http::organizations::update_organization,
        crate::inbound::http::organizations::delete_organization,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::list_users_by_organization,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::stats::get_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiStatus,
        FieldErrorBody,
        MessageEnvelopeSchema,
        OrganizationRequest,
        OrganizationBody,
        OrganizationWithUsersBody,
        MemberBody,
        UserRequest,
        UserBody,
        OrganizationSummaryBody,
        StatsBody,
    )),
    tags(
        (name = "organizations", description = "Create, read, update and delete organizations"),
        (name = "users", description = "Create, read, update and delete users"),
        (name = "stats", description = "Dashboard counts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
