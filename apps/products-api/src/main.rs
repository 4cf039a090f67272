//! Products API - REST server for the product catalog

use axum_helpers::server::create_production_app;
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{PostgresConfig, connect_from_config_with_retry, run_migrations};
use domain_products::{
    InMemoryProductRepository, PgProductRepository, ProductRepository, ProductService,
};
use eyre::WrapErr;
use migration::Migrator;
use std::future::Future;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::{Config, StoreBackend};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        store = %config.store,
        "Starting Products API"
    );

    match (config.store, config.postgres.clone()) {
        (StoreBackend::Postgres, Some(postgres)) => serve_postgres(&config, postgres).await?,
        (StoreBackend::Postgres, None) => {
            eyre::bail!("PostgreSQL store selected without a PostgreSQL configuration")
        }
        (StoreBackend::Memory, _) => {
            warn!("Using the in-memory store, changes are lost on restart");
            let service = ProductService::new(InMemoryProductRepository::seeded());
            serve(&config, service, async {}).await?;
        }
    }

    info!("Products API shutdown complete");
    Ok(())
}

async fn serve_postgres(config: &Config, postgres: PostgresConfig) -> eyre::Result<()> {
    let db = connect_from_config_with_retry(postgres, None)
        .await
        .wrap_err("Failed to connect to PostgreSQL")?;

    if config.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name)
            .await
            .wrap_err("Failed to run migrations")?;
    } else {
        info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let service = ProductService::new(PgProductRepository::new(db.clone()));
    let cleanup = async move {
        info!("Shutting down: closing PostgreSQL connections");
        match db.close().await {
            Ok(()) => info!("PostgreSQL connection pool closed"),
            Err(e) => warn!(error = %e, "Failed to close PostgreSQL connection pool"),
        }
    };

    serve(config, service, cleanup).await
}

async fn serve<R, F>(config: &Config, service: ProductService<R>, cleanup: F) -> eyre::Result<()>
where
    R: ProductRepository + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let router = api::app(service, config.app, &config.server)?;

    create_production_app(router, &config.server, config.shutdown_timeout, cleanup)
        .await
        .wrap_err("Server error")
}
