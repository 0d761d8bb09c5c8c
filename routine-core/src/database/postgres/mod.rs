mod companies;
mod order;

pub use companies::PostgresCompanyRepository;
pub use order::SqlOrderBy;

use std::{fmt, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::error::{Result, RoutineError};

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    companies: PostgresCompanyRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(connection_string)
            .await
            .map_err(|e| {
                RoutineError::Internal(format!(
                    "Database connection failed: {e}"
                ))
            })?;

        info!(max_connections, "Database pool initialized");
        Ok(Self::from_pool(pool, max_connections))
    }

    /// Wrap an existing pool, e.g. one provisioned by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool, max_connections: u32) -> Self {
        let companies = PostgresCompanyRepository::new(pool.clone());
        Self {
            pool,
            max_connections,
            companies,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn companies(&self) -> &PostgresCompanyRepository {
        &self.companies
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX),
            max_size: self.max_connections,
        }
    }

    /// Apply pending schema and seed migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
