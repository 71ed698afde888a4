//! Embedded PostgreSQL helpers shared by the Diesel integration suites.
//!
//! Each suite gets its own temporary database on the process-wide cluster,
//! migrated with the same embedded migrations the server runs at startup.
//!
//! Cluster bootstrap needs the PostgreSQL binaries, which are downloaded on
//! first use. When the cluster cannot start, suites print a
//! `SKIP-TEST-CLUSTER` marker and return early. Set `REQUIRE_TEST_CLUSTER=1`
//! in CI to turn that into a failure, or `SKIP_TEST_CLUSTER=1` to skip
//! without attempting a bootstrap.

use std::fmt::Display;
use std::time::Duration;

use orgdirectory::outbound::persistence::run_migrations_blocking;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

const PROVISION_RETRIES: usize = 3;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster that could not be prepared.
///
/// Returns `None` so callers can skip, unless `REQUIRE_TEST_CLUSTER` is set.
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if env_flag("REQUIRE_TEST_CLUSTER") {
        panic!("Test cluster setup failed: {reason}");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}

/// Create a temporary database on the shared cluster and migrate it.
pub fn provision_migrated_database() -> Result<TemporaryDatabase, String> {
    if env_flag("SKIP_TEST_CLUSTER") {
        return Err("SKIP_TEST_CLUSTER is set".to_owned());
    }

    let cluster = shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;

    let mut last_error = String::new();
    for attempt in 1..=PROVISION_RETRIES {
        match cluster.temporary_database(format!("test_{}", uuid::Uuid::new_v4()).as_str()) {
            Ok(database) => {
                run_migrations_blocking(database.url())
                    .map_err(|err| format!("migrate {}: {err}", database.url()))?;
                return Ok(database);
            }
            Err(err) => {
                last_error =
                    format!("create database: attempt {attempt}/{PROVISION_RETRIES}: {err:?}");
            }
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }

    Err(last_error)
}
