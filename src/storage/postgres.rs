use async_trait::async_trait;
use serde_json::Value;

use super::{Storage, StorageError};
use crate::database::{create_database_pool, Database};

/// Key/value rows in the `tqm_storage` table.
pub struct PgStorage {
    db: Database,
}

impl PgStorage {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let db = create_database_pool(database_url).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let value = sqlx::query_scalar::<_, Value>("SELECT value FROM tqm_storage WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO tqm_storage (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(&value)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
