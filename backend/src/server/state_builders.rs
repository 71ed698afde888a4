//! Builders wiring repositories into the domain services behind HTTP state.

use std::sync::Arc;

use orgdirectory::domain::ports::{OrganizationRepository, UserRepository};
use orgdirectory::domain::{DirectoryStatsService, OrganizationService, UserService};
use orgdirectory::inbound::http::state::HttpState;
use orgdirectory::outbound::memory::InMemoryDirectory;
use orgdirectory::outbound::persistence::{DieselOrganizationRepository, DieselUserRepository};
use orgdirectory::sample_data::SampleDataSeeder;
use tracing::warn;

use super::ServerConfig;

/// Driving ports shared by the HTTP handlers and startup seeding.
#[derive(Clone)]
pub struct DirectoryPorts {
    pub http_state: HttpState,
    pub seeder: SampleDataSeeder,
}

fn ports_over<O, U>(organizations: Arc<O>, users: Arc<U>) -> DirectoryPorts
where
    O: OrganizationRepository + 'static,
    U: UserRepository + 'static,
{
    let organization_service = Arc::new(OrganizationService::new(organizations.clone()));
    let user_service = Arc::new(UserService::new(users.clone(), organizations.clone()));
    let stats = Arc::new(DirectoryStatsService::new(organizations, users));

    DirectoryPorts {
        http_state: HttpState {
            organizations: organization_service.clone(),
            organizations_query: organization_service.clone(),
            users: user_service.clone(),
            users_query: user_service.clone(),
            stats: stats.clone(),
        },
        seeder: SampleDataSeeder::new(stats, organization_service, user_service),
    }
}

/// Build the directory ports from configuration.
///
/// Diesel repositories back the services when a pool is configured;
/// otherwise every port shares one [`InMemoryDirectory`].
pub fn build_directory_ports(config: &ServerConfig) -> DirectoryPorts {
    match &config.db_pool {
        Some(pool) => ports_over(
            Arc::new(DieselOrganizationRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; directory data is kept in memory");
            let store = Arc::new(InMemoryDirectory::new());
            ports_over(store.clone(), store)
        }
    }
}
