//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::{EmailAddress, OrganizationId, UserDraft, UserId, UserWithOrganization};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The unique email index rejected the write.
        DuplicateEmail { email: String } =>
            "email already in use: {email}",
        /// The organization foreign key rejected the write.
        OrganizationMissing { organization_id: i32 } =>
            "organization {organization_id} does not exist",
    }
}

/// Storage contract for users.
///
/// Every read returns users joined with their organization summary, newest
/// first (`created_at` descending, then id descending).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users.
    async fn list(&self) -> Result<Vec<UserWithOrganization>, UserRepositoryError>;

    /// Users belonging to one organization; empty when it has none or does
    /// not exist.
    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserWithOrganization>, UserRepositoryError>;

    /// One user, or `None` when absent.
    async fn find(&self, id: UserId) -> Result<Option<UserWithOrganization>, UserRepositoryError>;

    /// Whether any user other than `excluding` already holds `email`.
    async fn email_in_use(
        &self,
        email: &EmailAddress,
        excluding: Option<UserId>,
    ) -> Result<bool, UserRepositoryError>;

    /// Persist a new user.
    ///
    /// Fails with [`UserRepositoryError::DuplicateEmail`] or
    /// [`UserRepositoryError::OrganizationMissing`] when the store's
    /// constraints reject the row.
    async fn insert(&self, draft: &UserDraft) -> Result<UserWithOrganization, UserRepositoryError>;

    /// Overwrite every mutable field; `None` when the user is absent.
    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<UserWithOrganization>, UserRepositoryError>;

    /// Delete a user; `false` when it was already absent.
    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError>;
}
