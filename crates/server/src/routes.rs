use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use quiz_core::model::SourceId;
use services::{ManifestEntry, MutationError, PairStore};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DeletePairRequest {
    filename: Option<String>,
    index: Option<i64>,
}

#[derive(Serialize)]
pub struct DeletePairResponse {
    success: bool,
    remaining: usize,
}

/// Remove one answered/skipped pair from its backing file.
///
/// Field presence is checked by hand so an incomplete body maps to 400, a
/// rejected filename to 403, and an out-of-range index to 400, matching the
/// contract the client's fire-and-forget gateway expects.
pub async fn delete_pair_handler(
    State(state): State<AppState>,
    Json(request): Json<DeletePairRequest>,
) -> Result<Json<DeletePairResponse>, ApiError> {
    let (Some(filename), Some(index)) = (request.filename, request.index) else {
        return Err(ApiError::MissingField);
    };

    let source = SourceId::parse(filename).map_err(|_| ApiError::InvalidFilename)?;
    let index = usize::try_from(index).map_err(|_| ApiError::InvalidIndex)?;

    let remaining = state
        .store
        .remove_pair(&source, index)
        .await
        .map_err(|err| match err {
            MutationError::NotAnArray { .. } | MutationError::IndexOutOfRange { .. } => {
                ApiError::InvalidIndex
            }
            other => ApiError::Internal(other.to_string()),
        })?;

    info!(%source, index, remaining, "deleted pair");
    Ok(Json(DeletePairResponse {
        success: true,
        remaining,
    }))
}

/// List the sources the data directory advertises.
pub async fn manifest_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ManifestEntry>>, ApiError> {
    let entries = state
        .store
        .manifest()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(Json(entries))
}
