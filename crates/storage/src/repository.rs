use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use quiz_core::model::SourceId;
use quiz_core::shuffle::Seed;

/// Errors surfaced by schedule-state storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for per-source scheduling state.
///
/// Each source id owns two independently stored values: the shuffle seed
/// (written once, cleared only by `clear`) and the remaining-index queue
/// (rewritten after every pop, deleted by reset). Reads and writes are
/// last-write-wins; the scheduler is the only expected writer.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Fetch the persisted seed for a source, if one was ever minted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn seed(&self, source: &SourceId) -> Result<Option<Seed>, StorageError>;

    /// Persist the seed for a source.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the seed cannot be stored.
    async fn put_seed(&self, source: &SourceId, seed: Seed) -> Result<(), StorageError>;

    /// Fetch the remaining-index queue for a source, if present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read or the
    /// stored value does not decode.
    async fn remaining(&self, source: &SourceId) -> Result<Option<Vec<u32>>, StorageError>;

    /// Persist the remaining-index queue for a source.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the queue cannot be stored.
    async fn put_remaining(&self, source: &SourceId, indices: &[u32]) -> Result<(), StorageError>;

    /// Delete the remaining-index queue only; the seed survives.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deletion cannot be applied.
    async fn delete_remaining(&self, source: &SourceId) -> Result<(), StorageError>;

    /// Delete all state for a source, seed included.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deletion cannot be applied.
    async fn clear(&self, source: &SourceId) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
struct StateEntry {
    seed: Option<Seed>,
    remaining: Option<Vec<u32>>,
}

/// In-memory repository for tests and embedded use.
#[derive(Clone, Default)]
pub struct InMemoryScheduleRepository {
    state: Arc<Mutex<HashMap<String, StateEntry>>>,
}

impl InMemoryScheduleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, StateEntry>) -> T,
    ) -> Result<T, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn seed(&self, source: &SourceId) -> Result<Option<Seed>, StorageError> {
        self.with_state(|state| state.get(source.as_str()).and_then(|entry| entry.seed))
    }

    async fn put_seed(&self, source: &SourceId, seed: Seed) -> Result<(), StorageError> {
        self.with_state(|state| {
            state.entry(source.as_str().to_owned()).or_default().seed = Some(seed);
        })
    }

    async fn remaining(&self, source: &SourceId) -> Result<Option<Vec<u32>>, StorageError> {
        self.with_state(|state| {
            state
                .get(source.as_str())
                .and_then(|entry| entry.remaining.clone())
        })
    }

    async fn put_remaining(&self, source: &SourceId, indices: &[u32]) -> Result<(), StorageError> {
        self.with_state(|state| {
            state
                .entry(source.as_str().to_owned())
                .or_default()
                .remaining = Some(indices.to_vec());
        })
    }

    async fn delete_remaining(&self, source: &SourceId) -> Result<(), StorageError> {
        self.with_state(|state| {
            if let Some(entry) = state.get_mut(source.as_str()) {
                entry.remaining = None;
            }
        })
    }

    async fn clear(&self, source: &SourceId) -> Result<(), StorageError> {
        self.with_state(|state| {
            state.remove(source.as_str());
        })
    }
}
