//! Driving ports for user use cases.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::validation::{validate_user, validate_user_update};
use crate::domain::{
    Error, OrganizationId, OrganizationSummary, Role, User, UserDraft, UserId, UserInput,
    UserWithOrganization,
};

/// Read-side user use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user with its organization summary, newest first.
    async fn list_users(&self) -> Result<Vec<UserWithOrganization>, Error>;

    /// Users of one organization; empty when it has none or does not exist.
    async fn list_users_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserWithOrganization>, Error>;

    /// One user; fails with [`crate::domain::ErrorCode::NotFound`] when absent.
    async fn get_user(&self, id: UserId) -> Result<UserWithOrganization, Error>;
}

/// Write-side user use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate and persist a new user.
    async fn create_user(&self, input: UserInput) -> Result<UserWithOrganization, Error>;

    /// Validate and overwrite every mutable field of a user.
    async fn update_user(&self, id: UserId, input: UserInput)
    -> Result<UserWithOrganization, Error>;

    /// Delete a user.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}

const FIXTURE_USER_ID: i32 = 1;
const FIXTURE_ORGANIZATION_ID: i32 = 1;

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .unwrap_or_default()
}

fn fixture_user(id: UserId, draft: Option<&UserDraft>) -> UserWithOrganization {
    let user = match draft {
        Some(draft) => User {
            id,
            name: draft.name.as_str().to_owned(),
            email: draft.email.as_str().to_owned(),
            role: draft.role,
            organization_id: draft.organization_id,
            created_at: fixture_timestamp(),
        },
        None => User {
            id,
            name: "Jo".to_owned(),
            email: "jo@acme.test".to_owned(),
            role: Role::Admin,
            organization_id: OrganizationId::new(FIXTURE_ORGANIZATION_ID),
            created_at: fixture_timestamp(),
        },
    };
    UserWithOrganization {
        organization: OrganizationSummary {
            id: user.organization_id,
            name: "Acme".to_owned(),
        },
        user,
    }
}

/// Fixture query serving a single user with id `1` in organization `1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn list_users(&self) -> Result<Vec<UserWithOrganization>, Error> {
        Ok(vec![fixture_user(UserId::new(FIXTURE_USER_ID), None)])
    }

    async fn list_users_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserWithOrganization>, Error> {
        if organization_id.get() == FIXTURE_ORGANIZATION_ID {
            self.list_users().await
        } else {
            Ok(Vec::new())
        }
    }

    async fn get_user(&self, id: UserId) -> Result<UserWithOrganization, Error> {
        if id.get() == FIXTURE_USER_ID {
            Ok(fixture_user(id, None))
        } else {
            Err(Error::not_found("User not found"))
        }
    }
}

/// Fixture command that validates input and echoes it back without storing.
///
/// Only organization `1` and user `1` exist; the fixture user's email
/// (`jo@acme.test`) is taken.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersCommand;

impl FixtureUsersCommand {
    fn check_references(draft: &UserDraft, id: Option<UserId>) -> Result<(), Error> {
        if draft.organization_id.get() != FIXTURE_ORGANIZATION_ID {
            return Err(Error::invalid_request("Organization not found"));
        }
        let is_fixture_user = id.is_some_and(|id| id.get() == FIXTURE_USER_ID);
        if draft.email.as_str() == "jo@acme.test" && !is_fixture_user {
            return Err(Error::conflict("Email already exists"));
        }
        Ok(())
    }
}

#[async_trait]
impl UsersCommand for FixtureUsersCommand {
    async fn create_user(&self, input: UserInput) -> Result<UserWithOrganization, Error> {
        let draft = validate_user(&input)?;
        Self::check_references(&draft, None)?;
        Ok(fixture_user(UserId::new(FIXTURE_USER_ID + 1), Some(&draft)))
    }

    async fn update_user(
        &self,
        id: UserId,
        input: UserInput,
    ) -> Result<UserWithOrganization, Error> {
        let draft = validate_user_update(&input)?;
        if id.get() != FIXTURE_USER_ID {
            return Err(Error::not_found("User not found"));
        }
        Self::check_references(&draft, Some(id))?;
        Ok(fixture_user(id, Some(&draft)))
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        if id.get() == FIXTURE_USER_ID {
            Ok(())
        } else {
            Err(Error::not_found("User not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn input(email: &str, organization_id: &str) -> UserInput {
        UserInput {
            name: Some("Sam".into()),
            email: Some(email.into()),
            role: Some("Member".into()),
            organization_id: Some(organization_id.into()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_command_rejects_taken_email() {
        let error = FixtureUsersCommand
            .create_user(input("JO@acme.test", "1"))
            .await
            .expect_err("duplicate");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_command_allows_own_email_on_update() {
        let updated = FixtureUsersCommand
            .update_user(UserId::new(1), input("jo@acme.test", "1"))
            .await
            .expect("own email is fine");
        assert_eq!(updated.user.name, "Sam");
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_query_filters_by_organization() {
        let users = FixtureUsersQuery
            .list_users_by_organization(OrganizationId::new(9))
            .await
            .expect("listing");
        assert!(users.is_empty());
    }
}
