use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{ScheduleRepository, StorageError};
use quiz_core::model::SourceId;
use quiz_core::shuffle::Seed;

use super::SqliteRepository;

fn decode_seed(raw: i64) -> Result<Seed, StorageError> {
    let value = u32::try_from(raw)
        .map_err(|_| StorageError::Serialization(format!("stored seed {raw} is negative")))?;
    Seed::new(value).map_err(|err| StorageError::Serialization(err.to_string()))
}

#[async_trait]
impl ScheduleRepository for SqliteRepository {
    async fn seed(&self, source: &SourceId) -> Result<Option<Seed>, StorageError> {
        let row = sqlx::query("SELECT seed FROM schedule_state WHERE source_id = ?1")
            .bind(source.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: Option<i64> = row
            .try_get("seed")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        raw.map(decode_seed).transpose()
    }

    async fn put_seed(&self, source: &SourceId, seed: Seed) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO schedule_state (source_id, seed, remaining, updated_at)
            VALUES (?1, ?2, NULL, ?3)
            ON CONFLICT(source_id) DO UPDATE SET
                seed = excluded.seed,
                updated_at = excluded.updated_at
            ",
        )
        .bind(source.as_str())
        .bind(i64::from(seed.value()))
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn remaining(&self, source: &SourceId) -> Result<Option<Vec<u32>>, StorageError> {
        let row = sqlx::query("SELECT remaining FROM schedule_state WHERE source_id = ?1")
            .bind(source.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let encoded: Option<String> = row
            .try_get("remaining")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        encoded
            .map(|text| {
                serde_json::from_str(&text)
                    .map_err(|err| StorageError::Serialization(err.to_string()))
            })
            .transpose()
    }

    async fn put_remaining(&self, source: &SourceId, indices: &[u32]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(indices)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO schedule_state (source_id, seed, remaining, updated_at)
            VALUES (?1, NULL, ?2, ?3)
            ON CONFLICT(source_id) DO UPDATE SET
                remaining = excluded.remaining,
                updated_at = excluded.updated_at
            ",
        )
        .bind(source.as_str())
        .bind(encoded)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn delete_remaining(&self, source: &SourceId) -> Result<(), StorageError> {
        sqlx::query(
            r"
            UPDATE schedule_state
            SET remaining = NULL, updated_at = ?2
            WHERE source_id = ?1
            ",
        )
        .bind(source.as_str())
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self, source: &SourceId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM schedule_state WHERE source_id = ?1")
            .bind(source.as_str())
            .execute(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
