//! Append-only line-delimited JSON journal for harness state.
//!
//! This crate provides:
//! - The [`JournalEntry`] record written one per line
//! - Id allocation that scans only a bounded tail of the file
//! - Reader/writer APIs with strict and permissive modes
//!
//! ## Quick Start
//!
//! ```rust
//! use statekit_journal::{append_event, AppendRequest, JournalReader, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! # let dir = tempfile::TempDir::new()?;
//! # let path = dir.path().join("events.jsonl");
//! let request = AppendRequest::new("build.started", "2024-01-01T00:00:00+00:00")
//!     .with_data(json!({"target": "release"}));
//! let id = append_event(&path, request, &WriteOptions::default())?;
//! assert_eq!(id, 1);
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! while let Some(entry) = reader.read_entry()? {
//!     println!("{} {}", entry.id, entry.event);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`TailIdAllocator`] - Compute the next entry id
//! - [`JournalWriter`] - Append entries to journal files
//! - [`JournalReader`] - Read entries back

#![deny(missing_docs)]

/// Journal entry record.
pub mod entry;
/// Error types for journal operations.
pub mod errors;
/// Journal reader implementation.
pub mod reader;
/// Tail-window id allocation.
pub mod tail;
/// Journal writer implementation.
pub mod writer;

pub use entry::JournalEntry;
pub use errors::JournalError;
pub use reader::{JournalReader, ReadMode};
pub use tail::{next_id, TailIdAllocator, TailScanOptions};
pub use writer::{append_event, AppendRequest, JournalWriter, WriteOptions};
