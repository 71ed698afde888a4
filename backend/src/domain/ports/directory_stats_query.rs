//! Driving port for dashboard statistics.

use async_trait::async_trait;

use crate::domain::{DirectoryStats, Error};

/// Read the aggregate counts shown on the dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryStatsQuery: Send + Sync {
    async fn directory_stats(&self) -> Result<DirectoryStats, Error>;
}

/// Fixture returning fixed figures.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDirectoryStatsQuery;

#[async_trait]
impl DirectoryStatsQuery for FixtureDirectoryStatsQuery {
    async fn directory_stats(&self) -> Result<DirectoryStats, Error> {
        Ok(DirectoryStats {
            total_organizations: 1,
            total_users: 1,
            admin_users: 1,
            member_users: 0,
            recent_organizations: 0,
        })
    }
}
