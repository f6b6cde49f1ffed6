pub mod jsonl;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::models::StoredRecord;

pub use jsonl::{JsonlLog, LogFile};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to open log {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to append frame: {0}")]
    Write(#[from] std::io::Error),
    #[error("append task did not complete: {0}")]
    Aborted(String),
}

/// An append-only sink of stored records.
///
/// Implementations must write each record as one whole frame: after `append` returns,
/// the frame is either fully present or absent, and concurrent appends never
/// interleave.
#[async_trait]
pub trait RecordLog: Send + Sync {
    async fn append(&self, record: &StoredRecord) -> Result<(), PersistenceError>;
}
