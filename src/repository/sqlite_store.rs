use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, Result},
    repository::KeyValueStore,
};

/// Collections persisted as one row per key in the `collections` table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

const UPSERT: &str = r#"
    INSERT INTO collections (name, data, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT (name)
    DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
"#;

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let data = sqlx::query_scalar::<_, String>("SELECT data FROM collections WHERE name = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(data)
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(UPSERT)
            .bind(key)
            .bind(&value)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }

    async fn write_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        for (key, value) in &entries {
            sqlx::query(UPSERT)
                .bind(key)
                .bind(value)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
        }

        tx.commit().await?;
        Ok(())
    }
}
