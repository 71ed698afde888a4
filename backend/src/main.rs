//! Organization directory entry-point: loads settings, prepares the store and
//! serves the REST API with OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use orgdirectory::inbound::http::health::HealthState;
use orgdirectory::outbound::persistence::{DbPool, run_migrations};
use orgdirectory::sample_data::seed_sample_data_on_startup;
use orgdirectory::settings::AppSettings;
use server::{ServerConfig, build_directory_ports, create_server};

/// Application bootstrap.
#[actix_web::main]
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
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr);

    if let Some(pool_config) = settings.pool_config() {
        run_migrations(pool_config.database_url())
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }

    let ports = build_directory_ports(&config);
    seed_sample_data_on_startup(settings.seed_sample_data, &ports.seeder)
        .await
        .wrap_err("failed to seed sample data")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ports.http_state, &config)?;
    info!(%bind_addr, "organization directory listening");
    server.await?;
    Ok(())
}
