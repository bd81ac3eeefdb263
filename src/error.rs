//! Error types for extraction runs

use crate::processor::RunStats;
use std::io;

/// Errors that abort an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read input at line {line}")]
    SourceRead {
        line: u64,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output '{sink}' ({bytes_written} bytes already written)")]
    SinkWrite {
        sink: String,
        bytes_written: u64,
        #[source]
        source: io::Error,
    },

    #[error("Invalid processing options: {0}")]
    InvalidOptions(String),

    #[error("Failed to compile credential pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A failed run, together with whatever statistics were gathered before it stopped.
#[derive(Debug, thiserror::Error)]
#[error("Extraction failed after {} lines", .stats.total_lines)]
pub struct RunFailure {
    #[source]
    pub error: ExtractError,
    pub stats: RunStats,
}

impl RunFailure {
    pub fn new(error: ExtractError, stats: RunStats) -> Self {
        Self { error, stats }
    }
}
