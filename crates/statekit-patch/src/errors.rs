use thiserror::Error;

/// Errors that can occur while patching a document.
#[derive(Error, Debug)]
pub enum PatchError {
    /// An assignment argument has no `=`.
    #[error("expected KEY=JSON, got '{0}' (missing '=')")]
    MissingEquals(String),
    /// The right-hand side of an assignment is not valid JSON.
    #[error("invalid JSON value for '{path}': {source}")]
    InvalidValue {
        /// Key path of the assignment.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// The document root is not a JSON object.
    #[error("document root is not a JSON object")]
    RootNotObject,
    /// The document on disk is not valid JSON.
    #[error("invalid JSON document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
