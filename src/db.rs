//! Database connection management
//!
//! Builds the shared connection pool and hosts the customer store.

pub mod queries;
pub mod store;

pub use store::{CustomerStore, PgCustomerStore};

use crate::config::DatabaseConfig;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::info;

/// Errors raised while opening the pool at startup
#[derive(thiserror::Error, Debug)]
pub enum PoolInitError {
    #[error("Failed to create pool: {0}")]
    Create(#[from] deadpool_postgres::CreatePoolError),

    #[error("Failed to get pool connection: {0}")]
    Checkout(#[from] deadpool_postgres::PoolError),

    #[error("Failed to verify database connection: {0}")]
    Probe(#[from] tokio_postgres::Error),
}

/// Create a connection pool and verify it can reach the server
pub async fn create_pool(config: &DatabaseConfig) -> Result<Pool, PoolInitError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.max_pool_size));

    let pool = if config.use_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
        cfg.create_pool(Some(Runtime::Tokio1), tls)?
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)?
    };

    let client = pool.get().await?;
    client.query_one(queries::PING, &[]).await?;
    drop(client);

    info!(
        "Database pool ready: {}@{}:{}/{} (TLS: {}, max size: {})",
        config.user, config.host, config.port, config.database, config.use_tls, config.max_pool_size
    );
    Ok(pool)
}
