//! Apply the embedded database migrations, then seed sample data when
//! `seed_sample_data` is enabled.

use std::sync::Arc;

use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use orgdirectory::domain::{DirectoryStatsService, OrganizationService, UserService};
use orgdirectory::outbound::persistence::{
    DbPool, DieselOrganizationRepository, DieselUserRepository, run_migrations,
};
use orgdirectory::sample_data::{SampleDataSeeder, seed_sample_data_on_startup};
use orgdirectory::settings::AppSettings;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let pool_config = settings
        .pool_config()
        .ok_or_else(|| eyre!("ORGDIR_DATABASE_URL must be set to run migrations"))?;

    let applied = run_migrations(pool_config.database_url())
        .await
        .wrap_err("failed to apply database migrations")?;
    info!(count = applied.len(), "migration run finished");

    if settings.seed_sample_data {
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to create database pool")?;
        let organizations = Arc::new(DieselOrganizationRepository::new(pool.clone()));
        let users = Arc::new(DieselUserRepository::new(pool));
        let seeder = SampleDataSeeder::new(
            Arc::new(DirectoryStatsService::new(organizations.clone(), users.clone())),
            Arc::new(OrganizationService::new(organizations.clone())),
            Arc::new(UserService::new(users, organizations)),
        );
        seed_sample_data_on_startup(true, &seeder)
            .await
            .wrap_err("failed to seed sample data")?;
    }

    Ok(())
}
