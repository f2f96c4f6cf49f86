use async_trait::async_trait;
use serde::Serialize;

use quiz_core::model::SourceId;

use crate::loader::FsPairStore;

/// Boundary that removes a consumed pair from the backing store.
///
/// Deletion is advisory cleanup: the don't-show-again guarantee comes from
/// the remaining queue, so implementations report plain success/failure and
/// callers never block on the outcome.
#[async_trait]
pub trait MutationGateway: Send + Sync {
    /// Request deletion of the pair at `index` in `source`.
    ///
    /// Returns `false` when the store declined the request or the transport
    /// failed; the failure is logged by the implementation, never retried.
    async fn delete_pair(&self, source: &SourceId, index: u32) -> bool;
}

#[derive(Serialize)]
struct DeletePairBody<'a> {
    filename: &'a str,
    index: u32,
}

/// Gateway that posts deletions to the HTTP mutation endpoint.
#[derive(Debug, Clone)]
pub struct HttpMutationGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMutationGateway {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/delete-pair", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MutationGateway for HttpMutationGateway {
    async fn delete_pair(&self, source: &SourceId, index: u32) -> bool {
        let body = DeletePairBody {
            filename: source.as_str(),
            index,
        };

        match self.client.post(self.endpoint()).json(&body).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    %source,
                    index,
                    status = %response.status(),
                    "pair deletion rejected"
                );
                false
            }
            Err(err) => {
                tracing::warn!(%source, index, error = %err, "pair deletion failed");
                false
            }
        }
    }
}

/// Direct filesystem gateway for embedded use, mutating the store in place.
#[async_trait]
impl MutationGateway for FsPairStore {
    async fn delete_pair(&self, source: &SourceId, index: u32) -> bool {
        match self.remove_pair(source, index as usize).await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(%source, index, error = %err, "pair deletion failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_gateway_deletes_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pairs-1.json"), r#"[["A","B"],["C","D"]]"#).unwrap();

        let store = FsPairStore::new(dir.path());
        let source = SourceId::parse("pairs-1.json").unwrap();

        assert!(store.delete_pair(&source, 0).await);
        assert!(!store.delete_pair(&source, 9).await);

        let missing = SourceId::parse("absent.json").unwrap();
        assert!(!store.delete_pair(&missing, 0).await);
    }
}
