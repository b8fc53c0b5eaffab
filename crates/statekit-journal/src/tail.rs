//! Next-id allocation from the tail of a journal.
//!
//! Only the final `window_bytes` of the file are read, so the cost of an
//! append does not grow with the journal. The window usually starts in the
//! middle of a line; that fragment fails to parse and is skipped like any
//! other corrupt line.

use crate::entry::id_from_value;
use crate::errors::JournalError;
use serde_json::Value;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, warn};

/// Default number of trailing bytes read from the journal.
pub const DEFAULT_WINDOW_BYTES: u64 = 256 * 1024;

/// Default number of trailing lines inspected, most recent first.
pub const DEFAULT_MAX_LINES: usize = 50;

/// Bounds for the tail scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailScanOptions {
    /// Number of bytes read from the end of the file (default: 256 KiB).
    pub window_bytes: u64,
    /// Number of non-empty lines inspected from the end (default: 50).
    pub max_lines: usize,
}

impl Default for TailScanOptions {
    fn default() -> Self {
        Self {
            window_bytes: DEFAULT_WINDOW_BYTES,
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

/// Computes the next entry id for a journal.
///
/// # Example
///
/// ```rust
/// use statekit_journal::{TailIdAllocator, TailScanOptions};
///
/// let allocator = TailIdAllocator::with_options(TailScanOptions {
///     window_bytes: 4096,
///     max_lines: 10,
/// });
/// assert_eq!(allocator.next_id("does/not/exist.jsonl")?, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TailIdAllocator {
    options: TailScanOptions,
}

impl TailIdAllocator {
    /// Creates an allocator with the default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator with explicit bounds.
    pub fn with_options(options: TailScanOptions) -> Self {
        Self { options }
    }

    /// Returns the scan bounds in use.
    pub fn options(&self) -> TailScanOptions {
        self.options
    }

    /// Returns the id to assign to the next appended entry.
    ///
    /// A missing or empty journal yields 1. When no line in the scanned
    /// tail carries a usable `id`, numbering falls back to 1 as well; that
    /// is logged but never reported as an error.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Io`] if the file exists but cannot be read.
    pub fn next_id<P: AsRef<Path>>(&self, path: P) -> Result<u64, JournalError> {
        let path = path.as_ref();
        match self.scan(path)? {
            Scan::Found(last) => Ok(last.saturating_add(1)),
            Scan::Empty => Ok(1),
            Scan::Exhausted => {
                warn!(
                    path = %path.display(),
                    max_lines = self.options.max_lines,
                    window_bytes = self.options.window_bytes,
                    "no entry id found in journal tail; restarting ids at 1"
                );
                Ok(1)
            }
        }
    }

    /// Returns the id of the most recent readable entry, if any.
    pub fn last_id<P: AsRef<Path>>(&self, path: P) -> Result<Option<u64>, JournalError> {
        match self.scan(path.as_ref())? {
            Scan::Found(last) => Ok(Some(last)),
            Scan::Empty | Scan::Exhausted => Ok(None),
        }
    }

    fn scan(&self, path: &Path) -> Result<Scan, JournalError> {
        let (len, window) = match read_tail(path, self.options.window_bytes)? {
            Some(tail) => tail,
            None => return Ok(Scan::Empty),
        };
        if len == 0 {
            return Ok(Scan::Empty);
        }

        let text = String::from_utf8_lossy(&window);
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        for (back, line) in lines.iter().rev().take(self.options.max_lines).enumerate() {
            let Ok(value) = serde_json::from_str::<Value>(line) else {
                debug!(back, "skipping unparsable journal line");
                continue;
            };
            match value.get("id").and_then(id_from_value) {
                Some(id) => {
                    debug!(back, id, "found last entry id");
                    return Ok(Scan::Found(id));
                }
                None => debug!(back, "skipping journal line without usable id"),
            }
        }

        // A blank journal read in full has nothing to continue from.
        if lines.is_empty() && window.len() as u64 == len {
            Ok(Scan::Empty)
        } else {
            Ok(Scan::Exhausted)
        }
    }
}

/// Returns the next id for `path` using the default bounds.
pub fn next_id<P: AsRef<Path>>(path: P) -> Result<u64, JournalError> {
    TailIdAllocator::new().next_id(path)
}

enum Scan {
    Found(u64),
    Empty,
    Exhausted,
}

/// Reads at most `window` trailing bytes and returns them with the file
/// length. `Ok(None)` when the file is absent.
fn read_tail(path: &Path, window: u64) -> Result<Option<(u64, Vec<u8>)>, JournalError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let len = file.metadata()?.len();
    let start = len.saturating_sub(window);
    file.seek(SeekFrom::Start(start))?;

    let mut buf = Vec::with_capacity((len - start) as usize);
    file.take(window).read_to_end(&mut buf)?;
    Ok(Some((len, buf)))
}
