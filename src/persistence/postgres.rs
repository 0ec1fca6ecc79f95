//! PostgreSQL implementation of the persistence layer.
//!
//! Sheets are scoped by spreadsheet id. Rows are stored as JSONB arrays
//! of cells and read back in insertion order.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::{PropertyStore, TabularStore};
use crate::config::HookConfig;
use crate::error::HookError;

/// Opens a connection pool and applies pending migrations.
///
/// # Errors
///
/// Returns a [`HookError::Persistence`] if the database is unreachable or
/// a migration fails.
pub async fn connect(config: &HookConfig) -> Result<PgPool, HookError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| HookError::Persistence(e.to_string()))?;

    tracing::info!("database migrations applied");
    Ok(pool)
}

/// PostgreSQL-backed sheet store for one spreadsheet.
#[derive(Debug, Clone)]
pub struct PostgresTabularStore {
    pool: PgPool,
    spreadsheet_id: String,
}

impl PostgresTabularStore {
    /// Creates a store for `spreadsheet_id` on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool, spreadsheet_id: &str) -> Self {
        Self {
            pool,
            spreadsheet_id: spreadsheet_id.to_string(),
        }
    }
}

#[async_trait]
impl TabularStore for PostgresTabularStore {
    async fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> Result<bool, HookError> {
        let result = sqlx::query(
            "INSERT INTO sheets (spreadsheet_id, name, header) VALUES ($1, $2, $3) \
             ON CONFLICT (spreadsheet_id, name) DO NOTHING",
        )
        .bind(&self.spreadsheet_id)
        .bind(sheet)
        .bind(Json(header))
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() == 1;
        if created {
            tracing::info!(spreadsheet_id = %self.spreadsheet_id, sheet, "sheet created");
        }
        Ok(created)
    }

    async fn rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, HookError> {
        let rows = sqlx::query_scalar::<_, Json<Vec<String>>>(
            "SELECT cells FROM sheet_rows WHERE spreadsheet_id = $1 AND sheet_name = $2 \
             ORDER BY id ASC",
        )
        .bind(&self.spreadsheet_id)
        .bind(sheet)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|Json(cells)| cells).collect())
    }

    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<(), HookError> {
        sqlx::query("INSERT INTO sheet_rows (spreadsheet_id, sheet_name, cells) VALUES ($1, $2, $3)")
            .bind(&self.spreadsheet_id)
            .bind(sheet)
            .bind(Json(row))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// PostgreSQL-backed property store.
#[derive(Debug, Clone)]
pub struct PostgresPropertyStore {
    pool: PgPool,
}

impl PostgresPropertyStore {
    /// Creates a property store on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PostgresPropertyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, HookError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM script_properties WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), HookError> {
        sqlx::query(
            "INSERT INTO script_properties (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
