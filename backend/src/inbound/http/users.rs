//! User HTTP handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/organization/{org_id}
//! GET    /api/users/{id}
//! POST   /api/users
//! PUT    /api/users/{id}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{OrganizationId, UserInput, UserWithOrganization};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::schemas::MessageEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{scalar_text, user_path_id};

/// Request body for creating or replacing a user.
///
/// `org_id` accepts a JSON number or a numeric string.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    #[schema(example = "Jo Bloggs")]
    pub name: Option<String>,
    #[schema(example = "jo@acme.test")]
    pub email: Option<String>,
    /// `Admin` or `Member`; omitted means `Member`.
    #[schema(example = "Member")]
    pub role: Option<String>,
    #[schema(value_type = Option<i32>, example = 1)]
    pub org_id: Option<Value>,
}

impl From<UserRequest> for UserInput {
    fn from(value: UserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            role: value.role,
            organization_id: scalar_text(value.org_id),
        }
    }
}

/// Organization a user belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganizationSummaryBody {
    pub org_id: i32,
    pub name: String,
}

/// User record joined with its organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBody {
    #[schema(example = 1)]
    pub user_id: i32,
    pub name: String,
    pub email: String,
    #[schema(example = "Admin")]
    pub role: String,
    pub org_id: i32,
    pub created_at: DateTime<Utc>,
    pub organization: OrganizationSummaryBody,
}

impl From<UserWithOrganization> for UserBody {
    fn from(value: UserWithOrganization) -> Self {
        let UserWithOrganization { user, organization } = value;
        Self {
            user_id: user.id.get(),
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            org_id: user.organization_id.get(),
            created_at: user.created_at,
            organization: OrganizationSummaryBody {
                org_id: organization.id.get(),
                name: organization.name,
            },
        }
    }
}

fn user_list(users: Vec<UserWithOrganization>) -> HttpResponse {
    let body: Vec<UserBody> = users.into_iter().map(UserBody::from).collect();
    HttpResponse::Ok().json(ApiEnvelope::data(body))
}

/// List every user with their organization.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users, newest first", body = ApiEnvelope<Vec<UserBody>>),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users_query.list_users().await?;
    Ok(user_list(users))
}

/// List the users of one organization.
///
/// An identifier that cannot name an organization yields an empty list,
/// matching an organization without users.
#[utoipa::path(
    get,
    path = "/api/users/organization/{org_id}",
    params(("org_id" = String, Path, description = "Organization identifier")),
    responses(
        (status = 200, description = "Users of the organization", body = ApiEnvelope<Vec<UserBody>>),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsersByOrganization"
)]
#[get("/users/organization/{org_id}")]
pub async fn list_users_by_organization(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Some(organization_id) = OrganizationId::parse(&path) else {
        return Ok(user_list(Vec::new()));
    };
    let users = state
        .users_query
        .list_users_by_organization(organization_id)
        .await?;
    Ok(user_list(users))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = ApiEnvelope<UserBody>),
        (status = 404, description = "User not found", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_path_id(&path)?;
    let user = state.users_query.get_user(id).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(UserBody::from(user))))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = ApiEnvelope<UserBody>),
        (status = 400, description = "Validation failed, unknown organization or duplicate email", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let created = state.users.create_user(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::confirmed(
        "User created successfully",
        UserBody::from(created),
    )))
}

/// Replace every mutable field of a user. Unlike create, `role` is required.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiEnvelope<UserBody>),
        (status = 400, description = "Validation failed, unknown organization or duplicate email", body = MessageEnvelopeSchema),
        (status = 404, description = "User not found", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let id = user_path_id(&path)?;
    let updated = state
        .users
        .update_user(id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::confirmed(
        "User updated successfully",
        UserBody::from(updated),
    )))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageEnvelopeSchema),
        (status = 404, description = "User not found", body = MessageEnvelopeSchema),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_path_id(&path)?;
    state.users.delete_user(id).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::message("User deleted successfully")))
}

#[cfg(test)]
mod tests;
