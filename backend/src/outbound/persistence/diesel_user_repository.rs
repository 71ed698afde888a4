//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Every read joins `users` with `organizations` so callers receive the
//! nested organization summary. Constraint violations from the unique email
//! index and the organization foreign key surface as dedicated port errors.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, OrganizationId, UserDraft, UserId, UserWithOrganization};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error, map_pool_error,
};
use super::models::{OrganizationSummaryRow, UserChanges, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{organizations, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_joined(
        &self,
        id: i32,
    ) -> Result<Option<UserWithOrganization>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<(UserRow, OrganizationSummaryRow)> = users::table
            .inner_join(organizations::table)
            .filter(users::user_id.eq(id))
            .select((UserRow::as_select(), OrganizationSummaryRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(UserWithOrganization::from))
    }
}

fn map_pool(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, |message| UserRepositoryError::connection(message))
}

fn map_diesel(error: DieselError) -> UserRepositoryError {
    map_diesel_error(
        error,
        |message| UserRepositoryError::query(message),
        |message| UserRepositoryError::connection(message),
    )
}

/// Translate a failed write, turning constraint violations into typed errors.
fn map_write_error(error: DieselError, draft: &UserDraft) -> UserRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::Unique { constraint }) => {
            debug!(?constraint, "user write rejected by unique constraint");
            UserRepositoryError::duplicate_email(draft.email.as_str())
        }
        Some(ConstraintViolation::ForeignKey { constraint }) => {
            debug!(?constraint, "user write rejected by foreign key");
            UserRepositoryError::organization_missing(draft.organization_id.get())
        }
        None => map_diesel(error),
    }
}

fn changes(draft: &UserDraft) -> UserChanges<'_> {
    UserChanges {
        name: draft.name.as_str(),
        email: draft.email.as_str(),
        role: draft.role.as_str(),
        org_id: draft.organization_id.get(),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<UserWithOrganization>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(UserRow, OrganizationSummaryRow)> = users::table
            .inner_join(organizations::table)
            .order((users::created_at.desc(), users::user_id.desc()))
            .select((UserRow::as_select(), OrganizationSummaryRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(UserWithOrganization::from).collect())
    }

    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserWithOrganization>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(UserRow, OrganizationSummaryRow)> = users::table
            .inner_join(organizations::table)
            .filter(users::org_id.eq(organization_id.get()))
            .order((users::created_at.desc(), users::user_id.desc()))
            .select((UserRow::as_select(), OrganizationSummaryRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(UserWithOrganization::from).collect())
    }

    async fn find(&self, id: UserId) -> Result<Option<UserWithOrganization>, UserRepositoryError> {
        self.find_joined(id.get()).await
    }

    async fn email_in_use(
        &self,
        email: &EmailAddress,
        excluding: Option<UserId>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = users::table
            .filter(users::email.eq(email.as_str()))
            .into_boxed();
        if let Some(excluded) = excluding {
            query = query.filter(users::user_id.ne(excluded.get()));
        }

        diesel::select(diesel::dsl::exists(query))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)
    }

    async fn insert(&self, draft: &UserDraft) -> Result<UserWithOrganization, UserRepositoryError> {
        let inserted_id: i32 = {
            let mut conn = self.pool.get().await.map_err(map_pool)?;
            diesel::insert_into(users::table)
                .values(&changes(draft))
                .returning(users::user_id)
                .get_result(&mut conn)
                .await
                .map_err(|err| map_write_error(err, draft))?
        };

        self.find_joined(inserted_id)
            .await?
            .ok_or_else(|| UserRepositoryError::query("inserted user vanished before read-back"))
    }

    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<UserWithOrganization>, UserRepositoryError> {
        let updated: Option<i32> = {
            let mut conn = self.pool.get().await.map_err(map_pool)?;
            diesel::update(users::table.find(id.get()))
                .set(&changes(draft))
                .returning(users::user_id)
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(|err| map_write_error(err, draft))?
        };

        match updated {
            Some(user_id) => self.find_joined(user_id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorKind;
    use rstest::{fixture, rstest};

    use crate::domain::{UserInput, validation::validate_user};

    #[fixture]
    fn draft() -> UserDraft {
        validate_user(&UserInput {
            name: Some("Jo".into()),
            email: Some("Jo@Acme.test".into()),
            role: Some("Admin".into()),
            organization_id: Some("3".into()),
        })
        .expect("valid draft")
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint rejected row".to_owned()))
    }

    #[rstest]
    fn unique_violation_reports_normalised_email(draft: UserDraft) {
        let error = map_write_error(database_error(DatabaseErrorKind::UniqueViolation), &draft);
        assert_eq!(error, UserRepositoryError::duplicate_email("jo@acme.test"));
    }

    #[rstest]
    fn foreign_key_violation_reports_organization(draft: UserDraft) {
        let error = map_write_error(
            database_error(DatabaseErrorKind::ForeignKeyViolation),
            &draft,
        );
        assert_eq!(error, UserRepositoryError::organization_missing(3));
    }

    #[rstest]
    fn other_failures_fall_back_to_query_errors(draft: UserDraft) {
        let error = map_write_error(database_error(DatabaseErrorKind::CheckViolation), &draft);
        assert!(matches!(error, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn changes_use_canonical_role_text(draft: UserDraft) {
        let row = changes(&draft);
        assert_eq!(row.role, "Admin");
        assert_eq!(row.org_id, 3);
        assert_eq!(row.email, "jo@acme.test");
    }
}
