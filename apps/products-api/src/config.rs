//! Configuration for Products API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::time::Duration;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Backing store for the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Postgres,
    /// Seeded in-memory store, lost on restart
    Memory,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreBackend,
    /// Present only when `store` is `Postgres`
    pub postgres: Option<PostgresConfig>,
    pub run_migrations: bool,
    pub shutdown_timeout: Duration,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        let store = env_parse("PRODUCTS_STORE", "postgres")?;
        let postgres = match store {
            StoreBackend::Postgres => Some(PostgresConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            store,
            postgres,
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
            shutdown_timeout: Duration::from_secs(env_parse("SHUTDOWN_TIMEOUT_SECS", "30")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_postgres() {
        temp_env::with_vars(
            [
                ("PRODUCTS_STORE", None),
                ("DATABASE_URL", Some("postgresql://localhost/catalog")),
                ("RUN_MIGRATIONS", None),
                ("SHUTDOWN_TIMEOUT_SECS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreBackend::Postgres);
                assert_eq!(
                    config.postgres.map(|pg| pg.url),
                    Some("postgresql://localhost/catalog".to_string())
                );
                assert!(config.run_migrations);
                assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
                assert_eq!(config.app.name, "products_api");
            },
        );
    }

    #[test]
    fn test_config_postgres_requires_database_url() {
        temp_env::with_vars(
            [("PRODUCTS_STORE", Some("postgres")), ("DATABASE_URL", None)],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DATABASE_URL"));
            },
        );
    }

    #[test]
    fn test_config_memory_store_needs_no_database() {
        temp_env::with_vars(
            [
                ("PRODUCTS_STORE", Some("Memory")),
                ("DATABASE_URL", None),
                ("SHUTDOWN_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreBackend::Memory);
                assert!(config.postgres.is_none());
                assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_config_rejects_unknown_store() {
        temp_env::with_var("PRODUCTS_STORE", Some("sqlite"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("PRODUCTS_STORE"));
        });
    }

    #[test]
    fn test_config_rejects_malformed_flag() {
        temp_env::with_vars(
            [
                ("PRODUCTS_STORE", Some("memory")),
                ("RUN_MIGRATIONS", Some("sometimes")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("RUN_MIGRATIONS"));
            },
        );
    }
}
