mod types;

pub use types::{CalculationRecord, NewCalculation};

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::SipError;

/// Append-only SQLite log of past calculations.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Opens a pool against `database_url`, creating the database file if
    /// it does not exist. The schema is not touched until [`migrate`] runs.
    ///
    /// [`migrate`]: HistoryStore::migrate
    pub async fn connect(database_url: &str) -> Result<Self, SipError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory store, migrated and ready for use.
    ///
    /// Each SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self, SipError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the history table. Safe to call more than once.
    pub async fn migrate(&self) -> Result<(), SipError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Persists one calculation and returns its assigned id.
    pub async fn append(&self, calculation: &NewCalculation) -> Result<i64, SipError> {
        let result = sqlx::query(
            r"
            INSERT INTO calculation_history (
                monthly_investment, annual_return, years,
                total_invested, estimated_returns, total_value, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(calculation.monthly_investment)
        .bind(calculation.annual_return)
        .bind(calculation.years)
        .bind(calculation.total_invested)
        .bind(calculation.estimated_returns)
        .bind(calculation.total_value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, "appended calculation to history");
        Ok(id)
    }

    /// Every stored calculation, newest first.
    pub async fn list_all(&self) -> Result<Vec<CalculationRecord>, SipError> {
        let records = sqlx::query_as::<_, CalculationRecord>(
            r"
            SELECT id, monthly_investment, annual_return, years,
                   total_invested, estimated_returns, total_value, created_at
            FROM calculation_history
            ORDER BY id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }
}
