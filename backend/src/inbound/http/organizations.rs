//! Organization HTTP handlers.
//!
//! ```text
//! GET    /api/organizations
//! GET    /api/organizations/{id}
//! POST   /api/organizations
//! PUT    /api/organizations/{id}
//! DELETE /api/organizations/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Organization, OrganizationInput, OrganizationWithUsers, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::schemas::MessageEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::organization_path_id;

/// Request body for creating or replacing an organization.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct OrganizationRequest {
    #[schema(example = "Acme")]
    pub name: Option<String>,
    #[schema(example = "1 Main St")]
    pub address: Option<String>,
}

impl From<OrganizationRequest> for OrganizationInput {
    fn from(value: OrganizationRequest) -> Self {
        Self {
            name: value.name,
            address: value.address,
        }
    }
}

/// Organization record without its users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganizationBody {
    #[schema(example = 1)]
    pub org_id: i32,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationBody {
    fn from(value: Organization) -> Self {
        Self {
            org_id: value.id.get(),
            name: value.name,
            address: value.address,
            created_at: value.created_at,
        }
    }
}

/// Member listed under an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MemberBody {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    #[schema(example = "Member")]
    pub role: String,
}

impl From<UserSummary> for MemberBody {
    fn from(value: UserSummary) -> Self {
        Self {
            user_id: value.id.get(),
            name: value.name,
            email: value.email,
            role: value.role.to_string(),
        }
    }
}

/// Organization record with its users, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganizationWithUsersBody {
    pub org_id: i32,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub users: Vec<MemberBody>,
}

impl From<OrganizationWithUsers> for OrganizationWithUsersBody {
    fn from(value: OrganizationWithUsers) -> Self {
        let OrganizationWithUsers {
            organization,
            users,
        } = value;
        Self {
            org_id: organization.id.get(),
            name: organization.name,
            address: organization.address,
            created_at: organization.created_at,
            users: users.into_iter().map(MemberBody::from).collect(),
        }
    }
}

/// List every organization with its users.
#[utoipa::path(
    get,
    path = "/api/organizations",
    responses(
        (status = 200, description = "Organizations, newest first", body = ApiEnvelope<Vec<OrganizationWithUsersBody>>),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["organizations"],
    operation_id = "listOrganizations"
)]
#[get("/organizations")]
pub async fn list_organizations(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let organizations = state.organizations_query.list_organizations().await?;
    let body: Vec<OrganizationWithUsersBody> = organizations
        .into_iter()
        .map(OrganizationWithUsersBody::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(body)))
}

/// Fetch one organization with its users.
#[utoipa::path(
    get,
    path = "/api/organizations/{id}",
    params(("id" = String, Path, description = "Organization identifier")),
    responses(
        (status = 200, description = "Organization", body = ApiEnvelope<OrganizationWithUsersBody>),
        (status = 404, description = "Organization not found", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["organizations"],
    operation_id = "getOrganization"
)]
#[get("/organizations/{id}")]
pub async fn get_organization(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = organization_path_id(&path)?;
    let organization = state.organizations_query.get_organization(id).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(OrganizationWithUsersBody::from(
        organization,
    ))))
}

/// Create an organization.
#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = OrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = ApiEnvelope<OrganizationBody>),
        (status = 400, description = "Validation failed", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["organizations"],
    operation_id = "createOrganization"
)]
#[post("/organizations")]
pub async fn create_organization(
    state: web::Data<HttpState>,
    payload: web::Json<OrganizationRequest>,
) -> ApiResult<HttpResponse> {
    let created = state
        .organizations
        .create_organization(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::confirmed(
        "Organization created successfully",
        OrganizationBody::from(created),
    )))
}

/// Replace an organization's name and address.
#[utoipa::path(
    put,
    path = "/api/organizations/{id}",
    params(("id" = String, Path, description = "Organization identifier")),
    request_body = OrganizationRequest,
    responses(
        (status = 200, description = "Organization updated", body = ApiEnvelope<OrganizationBody>),
        (status = 400, description = "Validation failed", body = MessageEnvelopeSchema),
        (status = 404, description = "Organization not found", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["organizations"],
    operation_id = "updateOrganization"
)]
#[put("/organizations/{id}")]
pub async fn update_organization(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<OrganizationRequest>,
) -> ApiResult<HttpResponse> {
    let id = organization_path_id(&path)?;
    let updated = state
        .organizations
        .update_organization(id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::confirmed(
        "Organization updated successfully",
        OrganizationBody::from(updated),
    )))
}

/// Delete an organization that has no users.
#[utoipa::path(
    delete,
    path = "/api/organizations/{id}",
    params(("id" = String, Path, description = "Organization identifier")),
    responses(
        (status = 200, description = "Organization deleted", body = MessageEnvelopeSchema),
        (status = 400, description = "Organization still has users", body = MessageEnvelopeSchema),
        (status = 404, description = "Organization not found", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["organizations"],
    operation_id = "deleteOrganization"
)]
#[delete("/organizations/{id}")]
pub async fn delete_organization(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = organization_path_id(&path)?;
    state.organizations.delete_organization(id).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::message("Organization deleted successfully")))
}

#[cfg(test)]
#[path = "organizations_tests.rs"]
mod tests;
