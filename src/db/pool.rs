//! Connection pool setup.
//!
//! The server owns exactly one `MySqlPool`, created eagerly at startup and
//! closed by the transport on shutdown.

use crate::config::Config;
use crate::error::{DbError, DbResult};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::{debug, info, warn};

/// Create the connection pool and verify that at least one connection works.
pub async fn connect(config: &Config) -> DbResult<MySqlPool> {
    let pool_opts = config.pool_options();
    pool_opts.validate().map_err(DbError::config)?;

    info!(
        server = %config.server_addr(),
        user = %config.user,
        database = config.default_database().unwrap_or("<none>"),
        max_connections = pool_opts.max_connections,
        "Connecting to MySQL"
    );

    let pool = MySqlPoolOptions::new()
        .min_connections(pool_opts.min_connections)
        .max_connections(pool_opts.max_connections)
        .acquire_timeout(pool_opts.acquire_timeout())
        .idle_timeout(Some(pool_opts.idle_timeout()))
        .test_before_acquire(pool_opts.test_before_acquire)
        .connect_with(config.connect_options())
        .await
        .map_err(|e| {
            DbError::connection(
                format!("Failed to connect to {}: {}", config.server_addr(), e),
                connection_suggestion(&e),
            )
        })?;

    match server_version(&pool).await {
        Some(version) => info!(version = %version, "Connected to MySQL"),
        None => info!("Connected to MySQL"),
    }

    Ok(pool)
}

/// Get the server version from the connected database.
pub async fn server_version(pool: &MySqlPool) -> Option<String> {
    match sqlx::query_scalar::<_, String>("SELECT VERSION()")
        .fetch_one(pool)
        .await
    {
        Ok(version) => {
            debug!(version = %version, "Got server version");
            Some(version)
        }
        Err(e) => {
            warn!(error = %e, "Failed to get server version");
            None
        }
    }
}

/// Generate a helpful suggestion for connection errors.
pub fn connection_suggestion(error: &sqlx::Error) -> String {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") {
        return "Check that the MySQL server is running and MYSQL_HOST/MYSQL_PORT point at it"
            .to_string();
    }

    if error_str.contains("access denied") || error_str.contains("password") {
        return "Verify MYSQL_USER and MYSQL_PASSWORD".to_string();
    }

    if error_str.contains("unknown database") {
        return "Check that the database named by MYSQL_DATABASE exists".to_string();
    }

    if error_str.contains("tls") || error_str.contains("ssl") {
        return "Check TLS/SSL configuration or try disabling it".to_string();
    }

    if matches!(error, sqlx::Error::PoolTimedOut) {
        return "The server did not accept a connection in time; check MYSQL_HOST and firewall rules"
            .to_string();
    }

    "Verify MYSQL_HOST, MYSQL_PORT, MYSQL_USER and MYSQL_PASSWORD".to_string()
}
