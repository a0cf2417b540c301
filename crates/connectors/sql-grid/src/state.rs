//! Transient state used by the provider.
//!
//! This is initialized on startup.

use std::sync::Arc;
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use thiserror::Error;
use tracing::{info_span, Instrument};

use query_engine_execution::metrics;
use query_engine_execution::query::SqlxExecutor;
use sql_grid_configuration::{Configuration, PoolSettings};

/// State for our provider.
#[derive(Debug, Clone)]
pub struct State {
    pub pool: AnyPool,
    pub metrics: metrics::Metrics,
}

impl State {
    /// An executor sharing this state's pool and metrics.
    pub fn executor(&self) -> Arc<SqlxExecutor> {
        Arc::new(SqlxExecutor::new(self.pool.clone(), self.metrics.clone()))
    }
}

/// Create a connection pool and wrap it inside a provider State.
pub async fn create_state(
    configuration: &Configuration,
    metrics_registry: &mut prometheus::Registry,
) -> Result<State, InitializationError> {
    let pool = create_pool(&configuration.connection_uri, &configuration.pool_settings)
        .instrument(info_span!(
            "Create connection pool",
            internal.visibility = "user",
        ))
        .await?;

    let metrics = async {
        let metrics_inner = metrics::Metrics::initialize(metrics_registry)
            .map_err(InitializationError::MetricsError)?;
        Ok::<_, InitializationError>(metrics_inner)
    }
    .instrument(info_span!("Setup metrics"))
    .await?;

    Ok(State { pool, metrics })
}

/// Create a connection pool with default settings.
/// - <https://docs.rs/sqlx/latest/sqlx/pool/struct.PoolOptions.html>
async fn create_pool(
    connection_uri: &str,
    pool_settings: &PoolSettings,
) -> Result<AnyPool, InitializationError> {
    sqlx::any::install_default_drivers();

    AnyPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.pool_timeout))
        .idle_timeout(pool_settings.idle_timeout.map(Duration::from_secs))
        .max_lifetime(pool_settings.connection_lifetime.map(Duration::from_secs))
        .connect(connection_uri)
        .await
        .map_err(InitializationError::UnableToCreatePool)
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to initialize connection pool: {0}")]
    UnableToCreatePool(sqlx::Error),
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
}
