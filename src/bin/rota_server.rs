//! HTTP server assigning pull request reviewers within teams.
//!
//! Usage:
//!
//! ```text
//! RUST_LOG=info DATABASE_URL=postgres://rota@localhost/rota rota_server
//! ```
//!
//! Connection settings come from `DATABASE_URL` or the `DB_HOST`, `DB_PORT`,
//! `DB_USER`, `DB_PASSWORD` and `DB_NAME` variables; `SERVER_PORT` selects
//! the listening port. Pending migrations are applied before the listener
//! opens. SIGINT and SIGTERM drain in-flight requests and stop the server.

use rota::bootstrap::{connect_with_retry, migrate, review_service, shutdown_signal};
use rota::config::ServiceConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServiceConfig::from_env()?;
    let pool = connect_with_retry(&config).await?;
    migrate(&pool).await?;

    let app = rota::http::router(review_service(pool));
    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "rota listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("rota stopped");
    Ok(())
}
