use std::path::PathBuf;

use quill_term::ValueError;
use thiserror::Error;

/// Errors from reading, writing, or registering documents.
#[derive(Debug, Error)]
pub enum DocError {
    /// An attribute and `=` with nothing usable after them.
    #[error("line {line}: attribute has no value")]
    MissingValue { line: u64 },

    /// The value term could not be unquoted.
    #[error("line {line}: {source}")]
    UnfinishedValue {
        line: u64,
        #[source]
        source: ValueError,
    },

    /// A term that is not legal as an attribute name.
    #[error("line {line}: malformed attribute name")]
    MalformedAttribute { line: u64 },

    /// `{` or `=` where an attribute name was expected.
    #[error("line {line}: missing attribute name")]
    MissingAttribute { line: u64 },

    /// An attribute name not followed by `=`.
    #[error("line {line}: expected '=' after attribute")]
    NoEquals { line: u64 },

    /// A `}` with no open structure to close.
    #[error("line {line}: '}}' without matching '{{'")]
    ContextUnderflow { line: u64 },

    /// End of file with structures still open.
    #[error("end of file with {open} unclosed structure(s)")]
    UnclosedStruct { open: usize },

    /// The file parsed but contained no attributes at all.
    #[error("document has no attributes")]
    EmptyDocument,

    /// A line exceeding the maximum supported length.
    #[error("line {line}: line too long ({len} bytes)")]
    LineTooLong { line: u64, len: usize },

    /// The document has no root-level scalar `id` attribute.
    #[error("document {} declares no id attribute", .path.display())]
    MissingId { path: PathBuf },

    /// Two documents declared the same id.
    #[error("duplicate document id: {id}")]
    DuplicateId { id: String },

    /// I/O failure reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for document operations.
pub type Result<T> = std::result::Result<T, DocError>;
