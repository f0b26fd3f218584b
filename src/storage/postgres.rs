//! PostgreSQL document store: one JSONB table per collection.

use super::{DocumentStore, UpsertOp, WriteSummary};
use crate::crypto::hashing::content_hash;
use crate::domain::model::EntityKind;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// A document store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn checked_collection(collection: &str) -> Result<&str> {
    if validate_ident(collection) {
        Ok(collection)
    } else {
        Err(anyhow::anyhow!("invalid collection name {:?}", collection))
    }
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Creates the collection tables and the secondary index on the location key.
    ///
    /// One-time initialization; the sync pipeline itself never calls this.
    pub async fn ensure_collections(&self) -> Result<()> {
        for kind in EntityKind::ALL {
            let table = checked_collection(kind.collection())?;
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    natural_key TEXT PRIMARY KEY,
                    document JSONB NOT NULL,
                    content_hash TEXT NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )",
                table
            ))
            .execute(&self.pool)
            .await?;
        }

        let measurements = EntityKind::Location.collection();
        let key_field = EntityKind::Location.natural_key_field();
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {0}_{1}_idx ON {0} ((document->>'{1}'))",
            measurements, key_field
        ))
        .execute(&self.pool)
        .await?;

        tracing::info!(index = %format!("{}_{}_idx", measurements, key_field), "collections ready");
        Ok(())
    }

    pub async fn count(&self, collection: &str) -> Result<i64> {
        let table = checked_collection(collection)?;
        let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    /// Applies the batch inside one transaction: a failing op rolls back the whole page.
    async fn submit_batch(&self, collection: &str, ops: &[UpsertOp]) -> Result<WriteSummary> {
        let table = checked_collection(collection)?;
        let sql = format!(
            "INSERT INTO {0} (natural_key, document, content_hash, updated_at) \
             VALUES ($1, $2, $3, now()) \
             ON CONFLICT (natural_key) DO UPDATE SET \
                document = EXCLUDED.document, \
                content_hash = EXCLUDED.content_hash, \
                updated_at = now() \
             WHERE {0}.content_hash IS DISTINCT FROM EXCLUDED.content_hash \
             RETURNING (xmax = 0) AS inserted",
            table
        );

        let mut summary = WriteSummary::default();
        let mut transaction = self.pool.begin().await?;

        for op in ops {
            let document = op.document.to_json()?;
            let hash = content_hash(&document);

            let row = sqlx::query(&sql)
                .bind(&op.key_value)
                .bind(&document)
                .bind(&hash)
                .fetch_optional(&mut *transaction)
                .await
                .map_err(|e| anyhow::anyhow!("upsert of {}={:?} failed: {}", op.key_field, op.key_value, e))?;

            match row {
                None => summary.unchanged += 1,
                Some(row) => {
                    if row.try_get::<bool, _>("inserted")? {
                        summary.inserted += 1;
                    } else {
                        summary.replaced += 1;
                    }
                }
            }
        }

        transaction.commit().await?;
        Ok(summary)
    }
}
