//! The SATIRE error taxonomy (spec.md §7), shared by both binaries.

/// Every error the indexer or querier can raise. Every variant is fatal at
/// the point of detection — there is no recovery path in this engine.
#[derive(Debug, thiserror::Error)]
pub enum SatireError {
    /// Missing required arguments or an unknown argument name.
    #[error("usage error: {0}")]
    Usage(String),

    /// A malformed input line, an out-of-range score, or an out-of-range
    /// docid while reading the TDS triple stream.
    #[error("invalid input at line {line}: {message}")]
    InvalidInput { line: u64, message: String },

    /// A vocab entry with `postings_count == 0`, a run whose DOCID is
    /// `>= numDocs`, or a file whose length disagrees with its
    /// header-implied length.
    #[error("index corrupt: {0}")]
    IndexCorrupt(String),

    /// File-open, mmap, or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value outside its documented range.
    #[error("value out of range: {0}")]
    OutOfRange(String),
}

/// Convenience alias used throughout the workspace.
pub type SatireResult<T> = Result<T, SatireError>;
