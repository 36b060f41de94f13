use std::path::PathBuf;

use quill_doc::DocError;
use thiserror::Error;

/// Errors from the commit protocol.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Serializing a document to its `.new` file failed. No renames were
    /// attempted; every original is untouched.
    #[error("failed to write new version of {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: DocError,
    },

    /// The journal could not be renamed to its `.processed` marker. No
    /// document was replaced.
    #[error("failed to mark journal {} as processed: {source}", .path.display())]
    JournalMark {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rename failed partway through the commit. The documents in
    /// `committed` were already replaced (their `.old` files survive on
    /// disk); the documents in `pending` were not touched.
    #[error(
        "commit interrupted at {}: {} document(s) already replaced, {} pending: {source}",
        .failed.display(),
        .committed.len(),
        .pending.len()
    )]
    PartialCommit {
        failed: PathBuf,
        committed: Vec<PathBuf>,
        pending: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for commit operations.
pub type Result<T> = std::result::Result<T, CommitError>;
