//! Output sink traits and error types

use crate::model::CompletedRecord;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of completed records
///
/// Records arrive one at a time in completion order. Implementations must be
/// shareable across tasks.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Handles one completed record
    async fn emit(&self, record: &CompletedRecord) -> OutputResult<()>;
}

#[async_trait]
impl<T: RecordSink + ?Sized> RecordSink for Arc<T> {
    async fn emit(&self, record: &CompletedRecord) -> OutputResult<()> {
        (**self).emit(record).await
    }
}
