//! Recovery of structured output from free-form transcripts.
//!
//! A transcript is raw bytes of unknown encoding that may contain prose,
//! logs, and several JSON fragments. [`extract_last_json`] decodes it and
//! returns the JSON value that reaches furthest toward the end of the text.
//!
//! ```rust
//! use serde_json::json;
//! use statekit_extract::extract_last_json;
//!
//! let text = br#"thinking... {"a":1} then {"b":2,"c":3} done"#;
//! let found = extract_last_json(text)?;
//! assert_eq!(found.value, json!({"b": 2, "c": 3}));
//! # Ok::<(), statekit_extract::ExtractError>(())
//! ```

#![deny(missing_docs)]

/// Candidate-encoding detection.
pub mod encoding;
/// Error types for extraction.
pub mod errors;
/// Candidate scan and selection.
pub mod scan;

pub use encoding::{decode_text, Encoding};
pub use errors::ExtractError;
pub use scan::{extract_last_json, extract_last_json_from_str, Extraction};
