//! Organization domain service.
//!
//! Implements the organization driving ports on top of
//! [`OrganizationRepository`]. Validation always runs before the store is
//! touched, and a failed operation never mutates anything.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{
    OrganizationRepository, OrganizationRepositoryError, OrganizationsCommand, OrganizationsQuery,
};
use crate::domain::validation::validate_organization;
use crate::domain::{
    Error, Organization, OrganizationDeletion, OrganizationId, OrganizationInput,
    OrganizationWithUsers,
};

pub(crate) const ORGANIZATION_NOT_FOUND: &str = "Organization not found";
pub(crate) const ORGANIZATION_HAS_USERS: &str =
    "Cannot delete organization with existing users. Please delete users first.";

/// Organization service implementing the driving ports.
#[derive(Clone)]
pub struct OrganizationService<R> {
    repository: Arc<R>,
}

impl<R> OrganizationService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> OrganizationService<R>
where
    R: OrganizationRepository,
{
    /// Log the store failure and hide its detail behind `public_message`.
    fn map_repository_error(
        public_message: &'static str,
    ) -> impl FnOnce(OrganizationRepositoryError) -> Error {
        move |err| {
            error!(error = %err, "{public_message}");
            Error::store_unavailable(public_message)
        }
    }
}

#[async_trait]
impl<R> OrganizationsQuery for OrganizationService<R>
where
    R: OrganizationRepository,
{
    async fn list_organizations(&self) -> Result<Vec<OrganizationWithUsers>, Error> {
        self.repository
            .list_with_users()
            .await
            .map_err(Self::map_repository_error("Failed to fetch organizations"))
    }

    async fn get_organization(&self, id: OrganizationId) -> Result<OrganizationWithUsers, Error> {
        self.repository
            .find_with_users(id)
            .await
            .map_err(Self::map_repository_error("Failed to fetch organization"))?
            .ok_or_else(|| Error::not_found(ORGANIZATION_NOT_FOUND))
    }
}

#[async_trait]
impl<R> OrganizationsCommand for OrganizationService<R>
where
    R: OrganizationRepository,
{
    async fn create_organization(&self, input: OrganizationInput) -> Result<Organization, Error> {
        let draft = validate_organization(&input)?;
        let organization = self
            .repository
            .insert(&draft)
            .await
            .map_err(Self::map_repository_error("Failed to create organization"))?;
        debug!(org_id = %organization.id, "organization created");
        Ok(organization)
    }

    async fn update_organization(
        &self,
        id: OrganizationId,
        input: OrganizationInput,
    ) -> Result<Organization, Error> {
        let draft = validate_organization(&input)?;
        self.repository
            .update(id, &draft)
            .await
            .map_err(Self::map_repository_error("Failed to update organization"))?
            .ok_or_else(|| Error::not_found(ORGANIZATION_NOT_FOUND))
    }

    async fn delete_organization(&self, id: OrganizationId) -> Result<(), Error> {
        let outcome = self
            .repository
            .delete_if_unused(id)
            .await
            .map_err(Self::map_repository_error("Failed to delete organization"))?;

        match outcome {
            OrganizationDeletion::Deleted => {
                debug!(org_id = %id, "organization deleted");
                Ok(())
            }
            OrganizationDeletion::NotFound => Err(Error::not_found(ORGANIZATION_NOT_FOUND)),
            OrganizationDeletion::HasUsers { user_count } => {
                debug!(org_id = %id, user_count, "organization delete blocked by users");
                Err(Error::conflict(ORGANIZATION_HAS_USERS))
            }
        }
    }
}

#[cfg(test)]
#[path = "organization_service_tests.rs"]
mod tests;
