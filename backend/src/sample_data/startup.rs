//! Startup seeding orchestration.

use tracing::info;

use super::{SampleDataError, SampleDataSeeder, SeedOutcome};

/// Apply sample data on startup when enabled.
///
/// Returns `None` when seeding is disabled.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use orgdirectory::domain::{DirectoryStatsService, OrganizationService, UserService};
/// use orgdirectory::outbound::memory::InMemoryDirectory;
/// use orgdirectory::sample_data::{SampleDataSeeder, seed_sample_data_on_startup};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(InMemoryDirectory::new());
/// let seeder = SampleDataSeeder::new(
///     Arc::new(DirectoryStatsService::new(store.clone(), store.clone())),
///     Arc::new(OrganizationService::new(store.clone())),
///     Arc::new(UserService::new(store.clone(), store)),
/// );
/// let outcome = seed_sample_data_on_startup(false, &seeder).await?;
/// assert!(outcome.is_none());
/// # Ok(())
/// # }
/// ```
pub async fn seed_sample_data_on_startup(
    enabled: bool,
    seeder: &SampleDataSeeder,
) -> Result<Option<SeedOutcome>, SampleDataError> {
    if !enabled {
        info!(reason = "disabled", "sample data seeding skipped");
        return Ok(None);
    }

    let outcome = seeder.seed_if_empty().await?;
    match outcome {
        SeedOutcome::Applied {
            organizations,
            users,
        } => info!(organizations, users, "sample data seeding applied"),
        SeedOutcome::AlreadyPopulated {
            organizations,
            users,
        } => info!(
            organizations,
            users, "directory already contains data; sample seeding skipped"
        ),
    }
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        MockDirectoryStatsQuery, MockOrganizationsCommand, MockUsersCommand,
    };

    #[rstest]
    #[tokio::test]
    async fn disabled_seeding_touches_nothing() {
        let mut stats = MockDirectoryStatsQuery::new();
        stats.expect_directory_stats().never();
        let seeder = SampleDataSeeder::new(
            Arc::new(stats),
            Arc::new(MockOrganizationsCommand::new()),
            Arc::new(MockUsersCommand::new()),
        );

        let outcome = seed_sample_data_on_startup(false, &seeder)
            .await
            .expect("disabled seeding succeeds");

        assert!(outcome.is_none());
    }
}
