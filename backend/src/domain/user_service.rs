//! User domain service.
//!
//! Implements the user driving ports. Writes run their checks in a fixed
//! order: field validation, target existence (updates only), organization
//! existence, then email uniqueness. The unique index and foreign key in
//! the store remain the backstop for races between those checks and the
//! write; their violations map to the same errors the pre-checks produce.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::organization_service::ORGANIZATION_NOT_FOUND;
use crate::domain::ports::{
    OrganizationRepository, OrganizationRepositoryError, UserRepository, UserRepositoryError,
    UsersCommand, UsersQuery,
};
use crate::domain::validation::{validate_user, validate_user_update};
use crate::domain::{
    Error, OrganizationId, UserDraft, UserId, UserInput, UserWithOrganization,
};

pub(crate) const USER_NOT_FOUND: &str = "User not found";
pub(crate) const EMAIL_TAKEN: &str = "Email already exists";

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UserService<U, O> {
    users: Arc<U>,
    organizations: Arc<O>,
}

impl<U, O> UserService<U, O> {
    /// Create a new service over the user and organization repositories.
    pub fn new(users: Arc<U>, organizations: Arc<O>) -> Self {
        Self {
            users,
            organizations,
        }
    }
}

impl<U, O> UserService<U, O>
where
    U: UserRepository,
    O: OrganizationRepository,
{
    fn map_user_error(public_message: &'static str) -> impl FnOnce(UserRepositoryError) -> Error {
        move |err| match err {
            UserRepositoryError::DuplicateEmail { email } => {
                debug!(%email, "unique index rejected email");
                Error::conflict(EMAIL_TAKEN)
            }
            UserRepositoryError::OrganizationMissing { organization_id } => {
                debug!(org_id = organization_id, "foreign key rejected organization");
                Error::invalid_request(ORGANIZATION_NOT_FOUND)
            }
            other @ (UserRepositoryError::Connection { .. } | UserRepositoryError::Query { .. }) => {
                error!(error = %other, "{public_message}");
                Error::store_unavailable(public_message)
            }
        }
    }

    fn map_organization_error(
        public_message: &'static str,
    ) -> impl FnOnce(OrganizationRepositoryError) -> Error {
        move |err| {
            error!(error = %err, "{public_message}");
            Error::store_unavailable(public_message)
        }
    }

    async fn ensure_references(
        &self,
        draft: &UserDraft,
        excluding: Option<UserId>,
        public_message: &'static str,
    ) -> Result<(), Error> {
        let organization = self
            .organizations
            .find(draft.organization_id)
            .await
            .map_err(Self::map_organization_error(public_message))?;
        if organization.is_none() {
            return Err(Error::invalid_request(ORGANIZATION_NOT_FOUND));
        }

        let taken = self
            .users
            .email_in_use(&draft.email, excluding)
            .await
            .map_err(Self::map_user_error(public_message))?;
        if taken {
            return Err(Error::conflict(EMAIL_TAKEN));
        }
        Ok(())
    }
}

#[async_trait]
impl<U, O> UsersQuery for UserService<U, O>
where
    U: UserRepository,
    O: OrganizationRepository,
{
    async fn list_users(&self) -> Result<Vec<UserWithOrganization>, Error> {
        self.users
            .list()
            .await
            .map_err(Self::map_user_error("Failed to fetch users"))
    }

    async fn list_users_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserWithOrganization>, Error> {
        self.users
            .list_by_organization(organization_id)
            .await
            .map_err(Self::map_user_error("Failed to fetch users"))
    }

    async fn get_user(&self, id: UserId) -> Result<UserWithOrganization, Error> {
        self.users
            .find(id)
            .await
            .map_err(Self::map_user_error("Failed to fetch user"))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<U, O> UsersCommand for UserService<U, O>
where
    U: UserRepository,
    O: OrganizationRepository,
{
    async fn create_user(&self, input: UserInput) -> Result<UserWithOrganization, Error> {
        const FAILURE: &str = "Failed to create user";
        let draft = validate_user(&input)?;
        self.ensure_references(&draft, None, FAILURE).await?;

        let created = self
            .users
            .insert(&draft)
            .await
            .map_err(Self::map_user_error(FAILURE))?;
        debug!(user_id = %created.user.id, org_id = %created.organization.id, "user created");
        Ok(created)
    }

    async fn update_user(
        &self,
        id: UserId,
        input: UserInput,
    ) -> Result<UserWithOrganization, Error> {
        const FAILURE: &str = "Failed to update user";
        let draft = validate_user_update(&input)?;

        let existing = self
            .users
            .find(id)
            .await
            .map_err(Self::map_user_error(FAILURE))?;
        if existing.is_none() {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        self.ensure_references(&draft, Some(id), FAILURE).await?;

        self.users
            .update(id, &draft)
            .await
            .map_err(Self::map_user_error(FAILURE))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(Self::map_user_error("Failed to delete user"))?;
        if deleted {
            debug!(user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(Error::not_found(USER_NOT_FOUND))
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
