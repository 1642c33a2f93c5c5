//! Database connection and pool management

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Pool tuning; only the URL and size come from configuration
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl From<&DatabaseConfig> for PoolSettings {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            min_connections: config.max_connections.min(2),
            ..Default::default()
        }
    }
}

/// Create the PostgreSQL pool used by every repository
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let settings = PoolSettings::from(config);
    let connect_options =
        PgConnectOptions::from_str(&config.url)?.application_name("wellness-coach");

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        max = settings.max_connections,
        min = settings.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Readiness check used by `/health/ready`
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_settings() {
        let settings = PoolSettings::default();
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.min_connections, 2);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_min_connections_never_exceed_max() {
        let config = DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 1,
        };
        let settings = PoolSettings::from(&config);
        assert_eq!(settings.max_connections, 1);
        assert_eq!(settings.min_connections, 1);
    }
}
