use quill_term::ValueError;
use thiserror::Error;

/// Errors from journal processing.
///
/// Everything except [`JournalError::Io`] is a per-line error: it rejects
/// one line's batch of transactions and the run continues.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The line is too short to carry a checksum, or lacks the separating
    /// whitespace before it.
    #[error("line {line}: no checksum present")]
    MissingChecksum { line: u64 },

    /// The stored checksum is not hex or does not match the line text.
    #[error("line {line}: bad checksum {stored:?} (computed {computed:04x})")]
    BadChecksum {
        line: u64,
        stored: String,
        computed: u16,
    },

    /// A path and `=` with nothing usable after them.
    #[error("line {line}: transaction has no value")]
    MissingValue { line: u64 },

    /// The value term could not be unquoted.
    #[error("line {line}: {source}")]
    UnfinishedValue {
        line: u64,
        #[source]
        source: ValueError,
    },

    /// A path not followed by `=`.
    #[error("line {line}: expected '=' after attribute path")]
    NoEquals { line: u64 },

    /// A term that cannot start a transaction.
    #[error("line {line}: missing attribute path")]
    MissingAttribute { line: u64 },

    /// A path without a document id and attribute, with empty segments, or
    /// with characters illegal in attribute names.
    #[error("line {line}: malformed attribute path {path:?}")]
    MalformedAttribute { line: u64, path: String },

    /// The path's document id is not in the registry.
    #[error("line {line}: no loaded document with id {id:?}")]
    FileIdNotFound { line: u64, id: String },

    /// The path would overwrite a nested structure with a scalar, or walk
    /// through an existing scalar.
    #[error("line {line}: path {path:?} redefines a structure")]
    StructRedefinition { line: u64, path: String },

    /// A line exceeding the maximum supported length.
    #[error("line {line}: line too long ({len} bytes)")]
    LineTooLong { line: u64, len: usize },

    /// The journal file could not be read at all. Aborts the run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;
