//! Database connection management.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{error, info};

use crate::{Config, DatabaseCredentials, Error, Result};

/// Create a database connection pool.
///
/// Host, port and database name from the secret take precedence over the
/// environment when present.
pub async fn create_pool(config: &Config, credentials: &DatabaseCredentials) -> Result<PgPool> {
    let host = credentials.host.as_deref().unwrap_or(&config.db_host);
    let database = credentials.dbname.as_deref().unwrap_or(&config.db_name);
    info!("Connecting to database {} on {}", database, host);

    let options = PgConnectOptions::new()
        .host(host)
        .port(credentials.port.unwrap_or(5432))
        .database(database)
        .username(&credentials.username)
        .password(&credentials.password);

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to connect to database {}: {}", database, e);
            Error::Database(e)
        })?;

    Ok(pool)
}
