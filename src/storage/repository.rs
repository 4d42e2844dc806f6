use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::{Classification, Transaction, TransactionId};

use super::{MIGRATION_001_INITIAL, TransactionStore};

/// SQLite-backed transaction store.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: row.get("id"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            classification: Classification::from_stored(row.get("classification")),
            value: row.get("value_cents"),
            currency: row.get("currency"),
            converted_value: row.get("converted_cents"),
            description: row.get("description"),
        })
    }
}

impl TransactionStore for Repository {
    async fn save(&self, transaction: &mut Transaction) -> Result<TransactionId> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (created_at, classification, value_cents, currency, converted_cents, description)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(transaction.created_at.to_rfc3339())
        .bind(transaction.classification.as_str())
        .bind(transaction.value)
        .bind(&transaction.currency)
        .bind(transaction.converted_value)
        .bind(&transaction.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save transaction")?;

        transaction.id = row.get("id");
        debug!(id = transaction.id, "saved transaction");
        Ok(transaction.id)
    }

    async fn list_between(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Transaction>> {
        let mut query = String::from(
            "SELECT id, created_at, classification, value_cents, currency, converted_cents, description FROM transactions WHERE 1=1",
        );

        let start_str = start.map(|dt| dt.to_rfc3339());
        let end_str = end.map(|dt| dt.to_rfc3339());

        if start_str.is_some() {
            query.push_str(" AND created_at >= ?");
        }
        if end_str.is_some() {
            query.push_str(" AND created_at < ?");
        }
        query.push_str(" ORDER BY created_at");

        let mut sql_query = sqlx::query(&query);
        if let Some(ref s) = start_str {
            sql_query = sql_query.bind(s);
        }
        if let Some(ref e) = end_str {
            sql_query = sql_query.bind(e);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list transactions")?;

        debug!(count = rows.len(), "fetched transactions");
        rows.iter().map(Self::row_to_transaction).collect()
    }
}
