use thiserror::Error;

use crate::store::StoreError;

/// Failure while persisting a slot.
///
/// Reads never produce this: missing or malformed data reads as empty.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
