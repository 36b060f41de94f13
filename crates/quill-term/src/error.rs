use thiserror::Error;

/// Errors from unquoting a scanned term.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// End of input reached while still inside a quoted span.
    #[error("unmatched quote in value")]
    MissingQuote,

    /// A trailing `\` with no character after it.
    #[error("escape at end of value")]
    UnfinishedEscape,

    /// A `\` outside a quoted span; escapes are only legal inside quotes.
    #[error("escape outside quotes")]
    UnquotedEscape,
}

/// Result alias for term operations.
pub type Result<T> = std::result::Result<T, ValueError>;
