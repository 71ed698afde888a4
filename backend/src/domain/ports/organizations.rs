//! Driving ports for organization use cases.
//!
//! Inbound adapters call these traits instead of touching repositories.
//! Fixture implementations keep HTTP handlers testable without a store.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::validation::validate_organization;
use crate::domain::{
    Error, Organization, OrganizationId, OrganizationInput, OrganizationWithUsers, Role, UserId,
    UserSummary,
};

/// Read-side organization use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationsQuery: Send + Sync {
    /// Every organization with its users, newest first.
    async fn list_organizations(&self) -> Result<Vec<OrganizationWithUsers>, Error>;

    /// One organization with its users.
    ///
    /// Fails with [`crate::domain::ErrorCode::NotFound`] when absent.
    async fn get_organization(&self, id: OrganizationId) -> Result<OrganizationWithUsers, Error>;
}

/// Write-side organization use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationsCommand: Send + Sync {
    /// Validate and persist a new organization.
    async fn create_organization(&self, input: OrganizationInput) -> Result<Organization, Error>;

    /// Validate and overwrite name and address.
    async fn update_organization(
        &self,
        id: OrganizationId,
        input: OrganizationInput,
    ) -> Result<Organization, Error>;

    /// Delete an organization that has no users.
    async fn delete_organization(&self, id: OrganizationId) -> Result<(), Error>;
}

const FIXTURE_ORGANIZATION_ID: i32 = 1;

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .unwrap_or_default()
}

fn fixture_organization() -> OrganizationWithUsers {
    OrganizationWithUsers {
        organization: Organization {
            id: OrganizationId::new(FIXTURE_ORGANIZATION_ID),
            name: "Acme".to_owned(),
            address: "1 Main St".to_owned(),
            created_at: fixture_timestamp(),
        },
        users: vec![UserSummary {
            id: UserId::new(1),
            name: "Jo".to_owned(),
            email: "jo@acme.test".to_owned(),
            role: Role::Admin,
        }],
    }
}

/// Fixture query serving a single organization with id `1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrganizationsQuery;

#[async_trait]
impl OrganizationsQuery for FixtureOrganizationsQuery {
    async fn list_organizations(&self) -> Result<Vec<OrganizationWithUsers>, Error> {
        Ok(vec![fixture_organization()])
    }

    async fn get_organization(&self, id: OrganizationId) -> Result<OrganizationWithUsers, Error> {
        if id.get() == FIXTURE_ORGANIZATION_ID {
            Ok(fixture_organization())
        } else {
            Err(Error::not_found("Organization not found"))
        }
    }
}

/// Fixture command that validates input and echoes it back without storing.
///
/// Only organization `1` exists; it has users, so deleting it conflicts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrganizationsCommand;

#[async_trait]
impl OrganizationsCommand for FixtureOrganizationsCommand {
    async fn create_organization(&self, input: OrganizationInput) -> Result<Organization, Error> {
        let draft = validate_organization(&input)?;
        Ok(Organization {
            id: OrganizationId::new(FIXTURE_ORGANIZATION_ID + 1),
            name: draft.name.as_str().to_owned(),
            address: draft.address.as_str().to_owned(),
            created_at: fixture_timestamp(),
        })
    }

    async fn update_organization(
        &self,
        id: OrganizationId,
        input: OrganizationInput,
    ) -> Result<Organization, Error> {
        let draft = validate_organization(&input)?;
        if id.get() != FIXTURE_ORGANIZATION_ID {
            return Err(Error::not_found("Organization not found"));
        }
        Ok(Organization {
            id,
            name: draft.name.as_str().to_owned(),
            address: draft.address.as_str().to_owned(),
            created_at: fixture_timestamp(),
        })
    }

    async fn delete_organization(&self, id: OrganizationId) -> Result<(), Error> {
        if id.get() != FIXTURE_ORGANIZATION_ID {
            return Err(Error::not_found("Organization not found"));
        }
        Err(Error::conflict(
            "Cannot delete organization with existing users. Please delete users first.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_query_serves_known_id_only() {
        let query = FixtureOrganizationsQuery;
        let found = query
            .get_organization(OrganizationId::new(1))
            .await
            .expect("fixture organization");
        assert_eq!(found.organization.name, "Acme");

        let missing = query
            .get_organization(OrganizationId::new(2))
            .await
            .expect_err("unknown id");
        assert_eq!(missing.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_command_validates_input() {
        let error = FixtureOrganizationsCommand
            .create_organization(OrganizationInput::default())
            .await
            .expect_err("validation");
        assert_eq!(error.field_errors().len(), 2);
    }
}
