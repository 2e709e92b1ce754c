//! Process start-up: connection pool, schema migrations and shutdown signal.

use crate::config::ServiceConfig;
use crate::review::{
    adapters::postgres::{PostgresReviewRepository, ReviewPgPool},
    services::ReviewService,
};
use diesel::pg::{Pg, PgConnection};
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Review service wired to `PostgreSQL` storage and the system clock.
pub type PostgresReviewService = ReviewService<PostgresReviewRepository, DefaultClock>;

/// Errors raised while preparing the process to serve requests.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Every connection attempt failed.
    #[error("database unavailable after {attempts} attempts: {source}")]
    Connect {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        source: PoolError,
    },

    /// A pooled connection could not be checked out.
    #[error("failed to check out a connection: {0}")]
    Checkout(#[source] PoolError),

    /// A pending migration failed to apply.
    #[error("failed to apply migrations: {0}")]
    Migration(#[source] BoxError),

    /// A blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Builds the connection pool, retrying while the database is unreachable.
///
/// At least one attempt is made even when `connect_retries` is zero.
///
/// # Errors
///
/// Returns [`BootstrapError::Connect`] with the last pool error once every
/// attempt has failed.
pub async fn connect_with_retry(config: &ServiceConfig) -> Result<ReviewPgPool, BootstrapError> {
    let attempts = config.connect_retries.max(1);
    let mut attempt = 1;
    loop {
        let manager = ConnectionManager::<PgConnection>::new(config.database.connection_string());
        let max_size = config.max_connections.max(1);
        let outcome = tokio::task::spawn_blocking(move || {
            Pool::builder()
                .max_size(max_size)
                .min_idle(Some(1))
                .connection_timeout(CONNECTION_TIMEOUT)
                .build(manager)
        })
        .await?;

        match outcome {
            Ok(pool) => {
                info!(attempt, max_connections = max_size, "connected to database");
                return Ok(pool);
            }
            Err(source) if attempt >= attempts => {
                return Err(BootstrapError::Connect { attempts, source });
            }
            Err(err) => {
                warn!(attempt, attempts, error = %err, "database not ready, retrying");
                tokio::time::sleep(config.retry_delay).await;
                attempt += 1;
            }
        }
    }
}

/// Applies pending migrations on `connection`.
///
/// # Errors
///
/// Returns [`BootstrapError::Migration`] when a migration fails.
pub fn run_migrations(connection: &mut impl MigrationHarness<Pg>) -> Result<(), BootstrapError> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(BootstrapError::Migration)?;
    info!(applied = applied.len(), "database schema up to date");
    Ok(())
}

/// Applies pending migrations using a connection from `pool`.
///
/// # Errors
///
/// Returns [`BootstrapError::Checkout`] when no connection is available, or
/// [`BootstrapError::Migration`] when a migration fails.
pub async fn migrate(pool: &ReviewPgPool) -> Result<(), BootstrapError> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(BootstrapError::Checkout)?;
        run_migrations(&mut *connection)
    })
    .await?
}

/// Wires a review service to `pool`.
#[must_use]
pub fn review_service(pool: ReviewPgPool) -> PostgresReviewService {
    ReviewService::new(
        Arc::new(PostgresReviewRepository::new(pool)),
        Arc::new(DefaultClock),
    )
}

/// Resolves once the process receives SIGINT or, on Unix, SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
    }
}
