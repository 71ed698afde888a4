//! Dashboard statistics handler.

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DirectoryStats;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::schemas::MessageEnvelopeSchema;
use crate::inbound::http::state::HttpState;

/// Aggregate directory counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatsBody {
    pub total_organizations: usize,
    pub total_users: usize,
    pub admin_users: usize,
    pub member_users: usize,
    /// Organizations created within the last seven days.
    pub recent_organizations: usize,
}

impl From<DirectoryStats> for StatsBody {
    fn from(value: DirectoryStats) -> Self {
        Self {
            total_organizations: value.total_organizations,
            total_users: value.total_users,
            admin_users: value.admin_users,
            member_users: value.member_users,
            recent_organizations: value.recent_organizations,
        }
    }
}

/// Counts shown on the admin dashboard.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Directory statistics", body = ApiEnvelope<StatsBody>),
        (status = 500, description = "Store failure", body = MessageEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "getStats"
)]
#[get("/stats")]
pub async fn get_stats(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let stats = state.stats.directory_stats().await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(StatsBody::from(stats))))
}
