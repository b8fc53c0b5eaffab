use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization or parse error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    /// A line could not be read as a journal entry in strict mode.
    #[error("invalid entry at line {line}: {reason}")]
    InvalidEntry {
        /// 1-based line number within the journal.
        line: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Invalid UTF-8 in a journal line.
    #[error("invalid UTF-8 at line {line}")]
    InvalidUtf8 {
        /// 1-based line number within the journal.
        line: u64,
    },
}
