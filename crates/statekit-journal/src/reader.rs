//! Journal reader implementation.

use crate::entry::JournalEntry;
use crate::errors::JournalError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Read mode for handling damaged lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: a line that is not a valid entry is an error.
    Strict,
    /// Permissive mode: invalid lines are skipped.
    Permissive,
}

/// Sequential reader over a journal's entries, oldest first.
///
/// Blank lines are ignored in both modes.
///
/// # Example
///
/// ```rust
/// use statekit_journal::{JournalReader, ReadMode};
///
/// # let dir = tempfile::TempDir::new()?;
/// # let path = dir.path().join("events.jsonl");
/// # std::fs::write(&path, "")?;
/// let mut reader = JournalReader::open(&path, ReadMode::Permissive)?;
/// while let Some(entry) = reader.read_entry()? {
///     println!("{}: {}", entry.id, entry.event);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    reader: BufReader<File>,
    mode: ReadMode,
    line: u64,
    buf: Vec<u8>,
}

impl JournalReader {
    /// Opens a journal file for reading.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            mode,
            line: 0,
            buf: Vec::new(),
        })
    }

    /// Returns the number of lines consumed so far.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Reads the next entry. Returns `Ok(None)` at end-of-file.
    ///
    /// # Errors
    ///
    /// In [`ReadMode::Strict`], returns [`JournalError::InvalidUtf8`] or
    /// [`JournalError::InvalidEntry`] for a damaged line. I/O errors are
    /// returned in either mode.
    pub fn read_entry(&mut self) -> Result<Option<JournalEntry>, JournalError> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = match std::str::from_utf8(&self.buf) {
                Ok(text) => text.trim(),
                Err(_) => {
                    if self.mode == ReadMode::Permissive {
                        debug!(line = self.line, "skipping non-UTF-8 journal line");
                        continue;
                    }
                    return Err(JournalError::InvalidUtf8 { line: self.line });
                }
            };
            if text.is_empty() {
                continue;
            }

            match serde_json::from_str::<JournalEntry>(text) {
                Ok(entry) => return Ok(Some(entry)),
                Err(e) if self.mode == ReadMode::Permissive => {
                    debug!(line = self.line, error = %e, "skipping invalid journal line");
                }
                Err(e) => {
                    return Err(JournalError::InvalidEntry {
                        line: self.line,
                        reason: e.to_string(),
                    })
                }
            }
        }
    }

    /// Reads all remaining entries.
    pub fn read_all(&mut self) -> Result<Vec<JournalEntry>, JournalError> {
        let mut entries = Vec::new();
        while let Some(entry) = self.read_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}
