//! Output module for Post-Harvester
//!
//! Joins enrichment results with their chat provenance, restores discovery
//! order, and writes the final JSON array atomically.

mod assemble;
mod record;
mod writer;

pub use assemble::assemble_records;
pub use record::EnrichedRecord;
pub use writer::write_json_atomic;

use thiserror::Error;

/// Errors that can occur while saving the output file
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
