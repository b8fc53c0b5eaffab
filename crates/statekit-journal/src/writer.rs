//! Journal writer implementation.

use crate::entry::JournalEntry;
use crate::errors::JournalError;
use crate::tail::{TailIdAllocator, TailScanOptions};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::debug;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create missing parent directories (default: true).
    pub create_dirs: bool,
    /// Bounds used when allocating the next id (default: 256 KiB / 50 lines).
    pub tail: TailScanOptions,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create_dirs: true,
            tail: TailScanOptions::default(),
        }
    }
}

/// Journal writer for append-only entry storage.
///
/// Each entry is written as one compact JSON object followed by a single
/// `\n`. If the file does not already end in a newline (a torn earlier
/// write), one is inserted first so the new entry starts on its own line.
///
/// # Example
///
/// ```rust
/// use statekit_journal::{JournalEntry, JournalWriter, WriteOptions};
/// use serde_json::json;
///
/// # let dir = tempfile::TempDir::new()?;
/// # let path = dir.path().join("events.jsonl");
/// let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
/// writer.append_entry(&JournalEntry {
///     timestamp: "2024-01-01T00:00:00+00:00".to_string(),
///     event: "started".to_string(),
///     id: 1,
///     kind: "event".to_string(),
///     data: json!({}),
/// })?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalWriter {
    file: File,
    sync: bool,
    needs_newline: bool,
}

impl JournalWriter {
    /// Opens or creates a journal file for appending.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Io`] if parent directories cannot be created
    /// or the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let path = path.as_ref();
        if options.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let needs_newline = !ends_with_newline(&mut file)?;

        Ok(Self {
            file,
            sync: options.sync,
            needs_newline,
        })
    }

    /// Appends one entry as a single line.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if serialization or the write fails.
    pub fn append_entry(&mut self, entry: &JournalEntry) -> Result<(), JournalError> {
        let mut line = Vec::new();
        if self.needs_newline {
            line.push(b'\n');
        }
        serde_json::to_writer(&mut line, entry)?;
        line.push(b'\n');

        self.file.write_all(&line)?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        self.needs_newline = false;

        debug!(id = entry.id, event = %entry.event, "appended journal entry");
        Ok(())
    }

    /// Finishes writing and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(io::SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Everything needed to append one event except its id.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendRequest {
    /// Event name.
    pub event: String,
    /// ISO-8601 timestamp.
    pub timestamp: String,
    /// Entry type (default: `"event"`).
    pub kind: String,
    /// Payload (default: empty object).
    pub data: Value,
}

impl AppendRequest {
    /// Creates a request with type `"event"` and an empty object payload.
    pub fn new(event: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            timestamp: timestamp.into(),
            kind: "event".to_string(),
            data: Value::Object(Map::new()),
        }
    }

    /// Sets the payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Sets the entry type.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

/// Allocates the next id, appends the entry, and returns the id.
///
/// The journal is opened, written, and closed within this call.
///
/// # Errors
///
/// Returns [`JournalError`] on I/O or serialization failure. An unreadable
/// journal tail is not an error; see [`TailIdAllocator::next_id`].
pub fn append_event<P: AsRef<Path>>(
    path: P,
    request: AppendRequest,
    options: &WriteOptions,
) -> Result<u64, JournalError> {
    let path = path.as_ref();
    let id = TailIdAllocator::with_options(options.tail).next_id(path)?;

    let entry = JournalEntry {
        timestamp: request.timestamp,
        event: request.event,
        id,
        kind: request.kind,
        data: request.data,
    };

    let mut writer = JournalWriter::open(path, options.clone())?;
    writer.append_entry(&entry)?;
    writer.finish()?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("journal.jsonl");

        let id = append_event(
            &path,
            AppendRequest::new("start", "2024-01-01T00:00:00Z"),
            &WriteOptions::default(),
        )
        .unwrap();

        assert_eq!(id, 1);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\"timestamp\":\"2024-01-01T00:00:00Z\",\"event\":\"start\",\"id\":\"1\",\"type\":\"event\",\"data\":{}}\n"
        );
    }

    #[test]
    fn test_sequential_ids() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("journal.jsonl");

        for expected in 1..=5 {
            let request = AppendRequest::new(format!("step{}", expected), "t")
                .with_kind("note")
                .with_data(json!({"n": expected}));
            let id = append_event(&path, request, &WriteOptions::default()).unwrap();
            assert_eq!(id, expected);
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 5);
        assert!(content.ends_with('\n'));
        assert!(!content.ends_with("\n\n"));
    }

    #[test]
    fn test_repairs_missing_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("journal.jsonl");
        fs::write(
            &path,
            "{\"timestamp\":\"t\",\"event\":\"a\",\"id\":\"4\",\"type\":\"event\",\"data\":{}}\n{\"timestamp\":\"t\",\"ev",
        )
        .unwrap();

        let id = append_event(&path, AppendRequest::new("b", "t"), &WriteOptions::default())
            .unwrap();
        assert_eq!(id, 5);

        let content = fs::read_to_string(&path).unwrap();
        let last: Value = serde_json::from_str(content.lines().last().unwrap()).unwrap();
        assert_eq!(last["id"], "5");
        assert_eq!(last["event"], "b");
    }
}
