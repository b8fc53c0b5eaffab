use thiserror::Error;

/// Errors that can occur during extraction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// No candidate offset produced a complete JSON value.
    #[error("no JSON value found")]
    NotFound,
}
