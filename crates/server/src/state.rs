use std::path::Path;
use std::sync::Arc;

use services::FsPairStore;

/// Shared handle to the directory of pair files the API mutates.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FsPairStore>,
}

impl AppState {
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            store: Arc::new(FsPairStore::new(data_dir.as_ref())),
        }
    }
}
