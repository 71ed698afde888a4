//! Dashboard figures derived from the organization and user listings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::error;

use crate::domain::ports::{DirectoryStatsQuery, OrganizationRepository, UserRepository};
use crate::domain::{Error, Organization, Role, User};

/// Window used for [`DirectoryStats::recent_organizations`].
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryStats {
    pub total_organizations: usize,
    pub total_users: usize,
    pub admin_users: usize,
    pub member_users: usize,
    /// Organizations created within [`RECENT_WINDOW_DAYS`] of `now`.
    pub recent_organizations: usize,
}

impl DirectoryStats {
    /// Compute the figures from already-fetched collections.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use orgdirectory::domain::{DirectoryStats, Organization, User};
    ///
    /// let organizations: Vec<Organization> = Vec::new();
    /// let users: Vec<User> = Vec::new();
    /// let stats = DirectoryStats::compute(&organizations, &users, Utc::now());
    /// assert_eq!(stats, DirectoryStats::default());
    /// ```
    pub fn compute<'a>(
        organizations: impl IntoIterator<Item = &'a Organization>,
        users: impl IntoIterator<Item = &'a User>,
        now: DateTime<Utc>,
    ) -> Self {
        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        let mut stats = Self::default();

        for organization in organizations {
            stats.total_organizations += 1;
            if organization.created_at >= cutoff {
                stats.recent_organizations += 1;
            }
        }
        for user in users {
            stats.total_users += 1;
            match user.role {
                Role::Admin => stats.admin_users += 1,
                Role::Member => stats.member_users += 1,
            }
        }
        stats
    }
}

/// Statistics service implementing [`DirectoryStatsQuery`].
#[derive(Clone)]
pub struct DirectoryStatsService<O, U> {
    organizations: Arc<O>,
    users: Arc<U>,
}

impl<O, U> DirectoryStatsService<O, U> {
    pub fn new(organizations: Arc<O>, users: Arc<U>) -> Self {
        Self {
            organizations,
            users,
        }
    }
}

#[async_trait]
impl<O, U> DirectoryStatsQuery for DirectoryStatsService<O, U>
where
    O: OrganizationRepository,
    U: UserRepository,
{
    async fn directory_stats(&self) -> Result<DirectoryStats, Error> {
        let organizations = self.organizations.list_with_users().await.map_err(|err| {
            error!(error = %err, "organization listing failed while computing stats");
            Error::store_unavailable("Failed to fetch statistics")
        })?;
        let users = self.users.list().await.map_err(|err| {
            error!(error = %err, "user listing failed while computing stats");
            Error::store_unavailable("Failed to fetch statistics")
        })?;

        Ok(DirectoryStats::compute(
            organizations.iter().map(|entry| &entry.organization),
            users.iter().map(|entry| &entry.user),
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockOrganizationRepository, MockUserRepository, OrganizationRepositoryError,
    };
    use crate::domain::{ErrorCode, OrganizationId, UserId};
    use chrono::TimeZone;
    use rstest::rstest;

    fn organization(id: i32, created_at: DateTime<Utc>) -> Organization {
        Organization {
            id: OrganizationId::new(id),
            name: format!("Org {id}"),
            address: "1 Main St".into(),
            created_at,
        }
    }

    fn user(id: i32, role: Role) -> User {
        User {
            id: UserId::new(id),
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            role,
            organization_id: OrganizationId::new(1),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn counts_roles_and_recent_organizations() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).single().expect("valid date");
        let organizations = [
            organization(1, now - Duration::days(1)),
            organization(2, now - Duration::days(7)),
            organization(3, now - Duration::days(8)),
        ];
        let users = [user(1, Role::Admin), user(2, Role::Member), user(3, Role::Member)];

        let stats = DirectoryStats::compute(&organizations, &users, now);

        assert_eq!(
            stats,
            DirectoryStats {
                total_organizations: 3,
                total_users: 3,
                admin_users: 1,
                member_users: 2,
                recent_organizations: 2,
            }
        );
    }

    #[tokio::test]
    async fn service_maps_store_failure() {
        let mut organizations = MockOrganizationRepository::new();
        organizations
            .expect_list_with_users()
            .times(1)
            .return_once(|| Err(OrganizationRepositoryError::connection("refused")));
        let users = MockUserRepository::new();

        let service = DirectoryStatsService::new(Arc::new(organizations), Arc::new(users));
        let error = service.directory_stats().await.expect_err("store failure");

        assert_eq!(error.code(), ErrorCode::StoreUnavailable);
        assert_eq!(error.message(), "Failed to fetch statistics");
    }

    #[tokio::test]
    async fn service_computes_from_listings() {
        let mut organizations = MockOrganizationRepository::new();
        organizations.expect_list_with_users().times(1).return_once(|| {
            Ok(vec![crate::domain::OrganizationWithUsers {
                organization: organization(1, Utc::now()),
                users: Vec::new(),
            }])
        });
        let mut users = MockUserRepository::new();
        users.expect_list().times(1).return_once(|| {
            Ok(vec![crate::domain::UserWithOrganization {
                user: user(1, Role::Admin),
                organization: crate::domain::OrganizationSummary {
                    id: OrganizationId::new(1),
                    name: "Org 1".into(),
                },
            }])
        });

        let service = DirectoryStatsService::new(Arc::new(organizations), Arc::new(users));
        let stats = service.directory_stats().await.expect("stats");

        assert_eq!(stats.total_organizations, 1);
        assert_eq!(stats.admin_users, 1);
        assert_eq!(stats.recent_organizations, 1);
    }
}
