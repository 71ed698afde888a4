//! PostgreSQL-backed `OrganizationRepository` implementation using Diesel ORM.
//!
//! Listings read organizations and their users inside one transaction so both
//! SELECTs observe the same snapshot. Deletion locks the organization row
//! before counting members; concurrent user inserts take a key-share lock on
//! the same row and therefore wait until the delete commits or rolls back.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{OrganizationRepository, OrganizationRepositoryError};
use crate::domain::{
    Organization, OrganizationDeletion, OrganizationDraft, OrganizationId, OrganizationWithUsers,
    UserSummary,
};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error, map_pool_error,
};
use super::models::{OrganizationChanges, OrganizationRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{organizations, users};

/// Diesel-backed implementation of the `OrganizationRepository` port.
#[derive(Clone)]
pub struct DieselOrganizationRepository {
    pool: DbPool,
}

impl DieselOrganizationRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use orgdirectory::outbound::persistence::{
    ///     DbPool, DieselOrganizationRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselOrganizationRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> OrganizationRepositoryError {
    map_pool_error(error, |message| {
        OrganizationRepositoryError::connection(message)
    })
}

fn map_diesel(error: DieselError) -> OrganizationRepositoryError {
    map_diesel_error(
        error,
        |message| OrganizationRepositoryError::query(message),
        |message| OrganizationRepositoryError::connection(message),
    )
}

/// Attach each organization's users, preserving the order of both inputs.
fn group_users(
    organizations: Vec<OrganizationRow>,
    user_rows: Vec<UserRow>,
) -> Vec<OrganizationWithUsers> {
    let mut by_organization: HashMap<i32, Vec<UserSummary>> = HashMap::new();
    for row in user_rows {
        by_organization
            .entry(row.org_id)
            .or_default()
            .push(UserSummary::from(row));
    }

    organizations
        .into_iter()
        .map(|row| {
            let users = by_organization.remove(&row.org_id).unwrap_or_default();
            OrganizationWithUsers {
                organization: Organization::from(row),
                users,
            }
        })
        .collect()
}

enum DeleteOutcome {
    Missing,
    Referenced(i64),
    Deleted,
}

#[async_trait]
impl OrganizationRepository for DieselOrganizationRepository {
    async fn list_with_users(
        &self,
    ) -> Result<Vec<OrganizationWithUsers>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let (organization_rows, user_rows) = conn
            .transaction(|conn| {
                async move {
                    let organization_rows: Vec<OrganizationRow> = organizations::table
                        .order((
                            organizations::created_at.desc(),
                            organizations::org_id.desc(),
                        ))
                        .select(OrganizationRow::as_select())
                        .load(conn)
                        .await?;

                    let ids: Vec<i32> = organization_rows.iter().map(|row| row.org_id).collect();
                    let user_rows: Vec<UserRow> = users::table
                        .filter(users::org_id.eq_any(ids))
                        .order((users::created_at.desc(), users::user_id.desc()))
                        .select(UserRow::as_select())
                        .load(conn)
                        .await?;

                    Ok::<_, DieselError>((organization_rows, user_rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        Ok(group_users(organization_rows, user_rows))
    }

    async fn find_with_users(
        &self,
        id: OrganizationId,
    ) -> Result<Option<OrganizationWithUsers>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let found = conn
            .transaction(|conn| {
                async move {
                    let organization: Option<OrganizationRow> = organizations::table
                        .find(id.get())
                        .select(OrganizationRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(organization) = organization else {
                        return Ok(None);
                    };

                    let user_rows: Vec<UserRow> = users::table
                        .filter(users::org_id.eq(organization.org_id))
                        .order((users::created_at.desc(), users::user_id.desc()))
                        .select(UserRow::as_select())
                        .load(conn)
                        .await?;

                    Ok::<_, DieselError>(Some((organization, user_rows)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        Ok(found.map(|(organization, user_rows)| OrganizationWithUsers {
            organization: Organization::from(organization),
            users: user_rows.into_iter().map(UserSummary::from).collect(),
        }))
    }

    async fn find(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<OrganizationRow> = organizations::table
            .find(id.get())
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(Organization::from))
    }

    async fn insert(
        &self,
        draft: &OrganizationDraft,
    ) -> Result<Organization, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let changes = OrganizationChanges {
            name: draft.name.as_str(),
            address: draft.address.as_str(),
        };

        let row: OrganizationRow = diesel::insert_into(organizations::table)
            .values(&changes)
            .returning(OrganizationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(Organization::from(row))
    }

    async fn update(
        &self,
        id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let changes = OrganizationChanges {
            name: draft.name.as_str(),
            address: draft.address.as_str(),
        };

        let row: Option<OrganizationRow> = diesel::update(organizations::table.find(id.get()))
            .set(&changes)
            .returning(OrganizationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(Organization::from))
    }

    async fn delete_if_unused(
        &self,
        id: OrganizationId,
    ) -> Result<OrganizationDeletion, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let locked: Option<i32> = organizations::table
                        .find(id.get())
                        .select(organizations::org_id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;

                    if locked.is_none() {
                        return Ok(DeleteOutcome::Missing);
                    }

                    let user_count: i64 = users::table
                        .filter(users::org_id.eq(id.get()))
                        .count()
                        .get_result(conn)
                        .await?;

                    if user_count > 0 {
                        return Ok(DeleteOutcome::Referenced(user_count));
                    }

                    diesel::delete(organizations::table.find(id.get()))
                        .execute(conn)
                        .await?;

                    Ok::<_, DieselError>(DeleteOutcome::Deleted)
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(DeleteOutcome::Missing) => Ok(OrganizationDeletion::NotFound),
            Ok(DeleteOutcome::Referenced(user_count)) => {
                Ok(OrganizationDeletion::HasUsers { user_count })
            }
            Ok(DeleteOutcome::Deleted) => Ok(OrganizationDeletion::Deleted),
            Err(error) => match constraint_violation(&error) {
                Some(ConstraintViolation::ForeignKey { .. }) => {
                    // The restricting foreign key fired; at least one user remains.
                    Ok(OrganizationDeletion::HasUsers { user_count: 1 })
                }
                _ => Err(map_diesel(error)),
            },
        }
    }
}
