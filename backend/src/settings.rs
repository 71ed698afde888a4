//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ORGDIR_*` environment variables and
//! configuration files, in ascending precedence order of files, environment,
//! then flags.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `host` is not an IP address.
    #[error("invalid host address `{value}`")]
    InvalidHost { value: String },
}

/// Server, store and seeding configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ORGDIR")]
pub struct AppSettings {
    /// Interface to bind; defaults to all IPv4 interfaces.
    pub host: Option<String>,
    /// TCP port to bind; defaults to 8080.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub db_connect_timeout_secs: Option<u64>,
    /// Insert sample organizations and users when the store is empty.
    #[ortho_config(default = false)]
    pub seed_sample_data: bool,
}

impl AppSettings {
    /// Socket address the HTTP server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHost`] when `host` does not parse as an
    /// IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match self.host.as_deref() {
            None => DEFAULT_HOST,
            Some(raw) => raw.trim().parse().map_err(|_| SettingsError::InvalidHost {
                value: raw.to_owned(),
            })?,
        };
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Pool configuration, or `None` when no database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())?;
        Some(
            PoolConfig::new(url)
                .with_max_size(
                    self.db_max_connections
                        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
                )
                .with_connection_timeout(Duration::from_secs(
                    self.db_connect_timeout_secs
                        .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
                )),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "ORGDIR_HOST",
        "ORGDIR_PORT",
        "ORGDIR_DATABASE_URL",
        "ORGDIR_DB_MAX_CONNECTIONS",
        "ORGDIR_DB_CONNECT_TIMEOUT_SECS",
        "ORGDIR_SEED_SAMPLE_DATA",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("orgdirectory")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default host"),
            SocketAddr::new(DEFAULT_HOST, DEFAULT_PORT)
        );
        assert!(settings.pool_config().is_none());
        assert!(!settings.seed_sample_data);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ORGDIR_HOST", Some("127.0.0.1".to_owned())),
            ("ORGDIR_PORT", Some("9090".to_owned())),
            (
                "ORGDIR_DATABASE_URL",
                Some("postgres://localhost/directory".to_owned()),
            ),
            ("ORGDIR_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("ORGDIR_DB_CONNECT_TIMEOUT_SECS", Some("5".to_owned())),
            ("ORGDIR_SEED_SAMPLE_DATA", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid host"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("socket address")
        );
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://localhost/directory");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.connection_timeout(), Duration::from_secs(5));
        assert!(settings.seed_sample_data);
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let settings = AppSettings {
            host: None,
            port: None,
            database_url: Some("   ".to_owned()),
            db_max_connections: None,
            db_connect_timeout_secs: None,
            seed_sample_data: false,
        };
        assert!(settings.pool_config().is_none());
    }

    #[rstest]
    fn invalid_host_is_reported() {
        let settings = AppSettings {
            host: Some("not-an-ip".to_owned()),
            port: None,
            database_url: None,
            db_max_connections: None,
            db_connect_timeout_secs: None,
            seed_sample_data: false,
        };
        assert_eq!(
            settings.bind_addr(),
            Err(SettingsError::InvalidHost {
                value: "not-an-ip".to_owned()
            })
        );
    }
}
