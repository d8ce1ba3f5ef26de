//! Engine-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::{Collection, StoreError};

/// Engine errors - lifecycle and validation failures.
///
/// Absence of a record on a read path is not an error: queries return
/// `Ok(None)`. `NotFound` is reserved for commands that require the record
/// to exist (update, publish, restore).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Scheduled time {scheduled} is not in the future (now: {now})")]
    InvalidScheduleTime {
        scheduled: chrono::DateTime<chrono::Utc>,
        now: chrono::DateTime<chrono::Utc>,
    },

    #[error("Stored {collection} collection is corrupt: {detail}")]
    CorruptState {
        collection: Collection,
        detail: String,
    },

    #[error("Mutation rejected by access gate")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),
}
