//! Port for organization persistence.

use async_trait::async_trait;

use crate::domain::{
    Organization, OrganizationDeletion, OrganizationDraft, OrganizationId, OrganizationWithUsers,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by organization repository adapters.
    pub enum OrganizationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "organization repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "organization repository query failed: {message}",
    }
}

/// Storage contract for organizations and their user membership.
///
/// Listings are ordered newest first (`created_at` descending, then id
/// descending); nested users follow the same order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// All organizations with their users.
    async fn list_with_users(&self)
    -> Result<Vec<OrganizationWithUsers>, OrganizationRepositoryError>;

    /// One organization with its users, or `None` when absent.
    async fn find_with_users(
        &self,
        id: OrganizationId,
    ) -> Result<Option<OrganizationWithUsers>, OrganizationRepositoryError>;

    /// One organization without its users, or `None` when absent.
    async fn find(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError>;

    /// Persist a new organization and return the stored record.
    async fn insert(
        &self,
        draft: &OrganizationDraft,
    ) -> Result<Organization, OrganizationRepositoryError>;

    /// Overwrite name and address; `None` when the organization is absent.
    async fn update(
        &self,
        id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> Result<Option<Organization>, OrganizationRepositoryError>;

    /// Delete the organization only when no user references it.
    ///
    /// The membership check and the delete must be atomic with respect to
    /// concurrent user inserts: an implementation either locks the row or
    /// relies on a restricting foreign key, and reports a violation as
    /// [`OrganizationDeletion::HasUsers`].
    async fn delete_if_unused(
        &self,
        id: OrganizationId,
    ) -> Result<OrganizationDeletion, OrganizationRepositoryError>;
}
