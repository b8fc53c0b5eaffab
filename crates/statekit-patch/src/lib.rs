//! Dotted-path assignments for JSON state files.
//!
//! ```rust
//! use serde_json::json;
//! use statekit_patch::{apply, Assignment};
//!
//! let mut doc = json!({});
//! apply(&mut doc, &Assignment::parse("a.b.c=5")?)?;
//! assert_eq!(doc, json!({"a": {"b": {"c": 5}}}));
//! # Ok::<(), statekit_patch::PatchError>(())
//! ```

#![deny(missing_docs)]

/// Loading and saving documents.
pub mod document;
/// Error types for patch operations.
pub mod errors;
/// Dotted paths and assignments.
pub mod path;

pub use document::{load_document, save_document};
pub use errors::PatchError;
pub use path::{apply, Assignment, DottedPath};
