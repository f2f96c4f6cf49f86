use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quiz_core::model::{Pair, PairSet, SourceId};

use crate::error::{LoadError, MutationError};

/// Name of the manifest document listing the available sources.
pub const MANIFEST_FILE: &str = "manifest.json";

//
// ─── MANIFEST ──────────────────────────────────────────────────────────────────
//

/// One row of the source manifest: either a bare filename or `{name, file}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    Named { name: String, file: String },
    Plain(String),
}

impl ManifestEntry {
    /// Filename to load for this entry.
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            ManifestEntry::Named { file, .. } => file,
            ManifestEntry::Plain(file) => file,
        }
    }

    /// Human-facing label; falls back to the filename.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            ManifestEntry::Named { name, .. } => name,
            ManifestEntry::Plain(file) => file,
        }
    }
}

//
// ─── PARSING ───────────────────────────────────────────────────────────────────
//

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One bad row becomes the placeholder pair instead of aborting the load.
fn coerce_pair(row: &Value) -> Pair {
    match row {
        Value::Array(cells) if cells.len() >= 2 => {
            Pair::new(cell_text(&cells[0]), cell_text(&cells[1]))
        }
        _ => Pair::placeholder(),
    }
}

fn pairs_from_value(name: &str, value: Value) -> Result<PairSet, LoadError> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("pairs") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(LoadError::Shape {
                    name: name.to_owned(),
                });
            }
        },
        _ => {
            return Err(LoadError::Shape {
                name: name.to_owned(),
            });
        }
    };

    Ok(PairSet::new(rows.iter().map(coerce_pair).collect()))
}

fn manifest_from_value(name: &str, value: Value) -> Result<Vec<ManifestEntry>, LoadError> {
    serde_json::from_value(value).map_err(|source| LoadError::Parse {
        name: name.to_owned(),
        source,
    })
}

//
// ─── PAIR STORE ────────────────────────────────────────────────────────────────
//

/// Read access to the documents backing the question sets.
#[async_trait]
pub trait PairStore: Send + Sync {
    /// Load and normalize the pair list for one source.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the resource is unreachable, is not valid
    /// JSON, or is shaped as neither an array nor `{pairs: [...]}`.
    async fn load(&self, source: &SourceId) -> Result<PairSet, LoadError>;

    /// Load the manifest listing the available sources.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the manifest is unreachable or malformed;
    /// callers may substitute a fallback list.
    async fn manifest(&self) -> Result<Vec<ManifestEntry>, LoadError>;
}

/// Pair store over a local directory of JSON files.
///
/// This is the store the HTTP server mutates; `remove_pair` implements the
/// server side of the deletion endpoint.
#[derive(Debug, Clone)]
pub struct FsPairStore {
    base_dir: PathBuf,
}

impl FsPairStore {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    async fn read_value(&self, name: &str) -> Result<Value, LoadError> {
        let text = tokio::fs::read_to_string(self.path_for(name))
            .await
            .map_err(|source| LoadError::Io {
                name: name.to_owned(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            name: name.to_owned(),
            source,
        })
    }

    /// Remove the pair at `index` from the backing file and write the file
    /// back, shifting later elements down by one.
    ///
    /// This is a plain read-modify-write with no file locking; one writer at
    /// a time is the supported concurrency level.
    ///
    /// # Errors
    ///
    /// Returns `MutationError` when the file cannot be read or written, does
    /// not hold a bare JSON array, or the index is out of range.
    pub async fn remove_pair(
        &self,
        source: &SourceId,
        index: usize,
    ) -> Result<usize, MutationError> {
        let path = self.path_for(source.as_str());
        let text = tokio::fs::read_to_string(&path).await?;
        let value: Value = serde_json::from_str(&text)?;

        let Value::Array(mut rows) = value else {
            return Err(MutationError::NotAnArray {
                name: source.as_str().to_owned(),
            });
        };
        if index >= rows.len() {
            return Err(MutationError::IndexOutOfRange {
                index,
                len: rows.len(),
            });
        }

        rows.remove(index);
        let remaining = rows.len();
        let rewritten = serde_json::to_string_pretty(&Value::Array(rows))?;
        tokio::fs::write(&path, rewritten).await?;

        Ok(remaining)
    }
}

#[async_trait]
impl PairStore for FsPairStore {
    async fn load(&self, source: &SourceId) -> Result<PairSet, LoadError> {
        let value = self.read_value(source.as_str()).await?;
        pairs_from_value(source.as_str(), value)
    }

    async fn manifest(&self) -> Result<Vec<ManifestEntry>, LoadError> {
        let value = self.read_value(MANIFEST_FILE).await?;
        manifest_from_value(MANIFEST_FILE, value)
    }
}

/// Pair store over a remote base URL, the client-side flavor.
#[derive(Debug, Clone)]
pub struct HttpPairStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPairStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_value(&self, name: &str) -> Result<Value, LoadError> {
        let url = format!("{}/{name}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LoadError::Http {
                name: name.to_owned(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                name: name.to_owned(),
                status: response.status(),
            });
        }

        response.json().await.map_err(|source| LoadError::Http {
            name: name.to_owned(),
            source,
        })
    }
}

#[async_trait]
impl PairStore for HttpPairStore {
    async fn load(&self, source: &SourceId) -> Result<PairSet, LoadError> {
        let value = self.fetch_value(source.as_str()).await?;
        pairs_from_value(source.as_str(), value)
    }

    async fn manifest(&self) -> Result<Vec<ManifestEntry>, LoadError> {
        let value = self.fetch_value(MANIFEST_FILE).await?;
        manifest_from_value(MANIFEST_FILE, value)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
