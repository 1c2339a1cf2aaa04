//! Server Configuration
//!
//! Environment-driven configuration, centered on the required PostgreSQL
//! connection. Unlike optional integrations, the database is load-bearing:
//! a chat server that cannot persist messages must not come up, so a
//! missing or unreachable `DATABASE_URL` is a startup error rather than a
//! degraded mode.

use sqlx::PgPool;
use thiserror::Error;

/// Errors that abort server startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("Database connection failed: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect to the database and bring the schema up to date.
///
/// 1. Reads `DATABASE_URL` from the environment
/// 2. Creates the connection pool
/// 3. Runs the embedded migrations
pub async fn load_database() -> Result<PgPool, StartupError> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| StartupError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Port the server binds, `SERVER_PORT` env with a default of 5000.
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(5000)
}
