//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use crate::domain::{
    Organization, OrganizationId, OrganizationSummary, Role, User, UserId, UserSummary,
    UserWithOrganization,
};

use super::schema::{organizations, users};

/// Row struct for reading from the organizations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganizationRow {
    pub org_id: i32,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable and changeset struct for organization writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = organizations)]
pub(crate) struct OrganizationChanges<'a> {
    pub name: &'a str,
    pub address: &'a str,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub org_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable and changeset struct for user writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChanges<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub org_id: i32,
}

/// Organization columns needed for the nested summary on user reads.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganizationSummaryRow {
    pub org_id: i32,
    pub name: String,
}

pub(crate) fn parse_role(raw: &str, user_id: i32) -> Role {
    raw.parse().unwrap_or_else(|_| {
        warn!(
            value = raw,
            user_id, "unrecognised role value, defaulting to Member"
        );
        Role::Member
    })
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Self {
            id: OrganizationId::new(row.org_id),
            name: row.name,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.user_id),
            role: parse_role(&row.role, row.user_id),
            name: row.name,
            email: row.email,
        }
    }
}

impl From<(UserRow, OrganizationSummaryRow)> for UserWithOrganization {
    fn from((user, organization): (UserRow, OrganizationSummaryRow)) -> Self {
        Self {
            user: User {
                id: UserId::new(user.user_id),
                role: parse_role(&user.role, user.user_id),
                name: user.name,
                email: user.email,
                organization_id: OrganizationId::new(user.org_id),
                created_at: user.created_at,
            },
            organization: OrganizationSummary {
                id: OrganizationId::new(organization.org_id),
                name: organization.name,
            },
        }
    }
}
