//! Append command implementation.

use crate::logging::LogArgs;
use chrono::{Local, SecondsFormat};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use serde_json::Value;
use statekit_journal::{append_event, AppendRequest, TailScanOptions, WriteOptions};
use std::path::PathBuf;
use tracing::info;

/// Append a numbered event to a line-delimited JSON journal and print its id
#[derive(Parser, Debug)]
#[command(name = "append-event")]
pub struct Cli {
    /// Path to journal file (created with its parent directories if missing)
    pub journal: PathBuf,
    /// Event name
    pub event: String,
    /// Event payload as an inline JSON string
    #[arg(long, conflicts_with = "data_file")]
    pub data_json: Option<String>,
    /// Event payload read from a JSON file
    #[arg(long)]
    pub data_file: Option<PathBuf>,
    /// ISO-8601 timestamp (default: current local time with offset)
    #[arg(long)]
    pub timestamp: Option<String>,
    /// Entry type
    #[arg(long = "type", default_value = "event")]
    pub kind: String,
    /// Sync file to disk after append
    #[arg(long)]
    pub sync: bool,
    /// Bytes read from the end of the journal when allocating the id
    #[arg(
        long,
        default_value_t = statekit_journal::tail::DEFAULT_WINDOW_BYTES,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tail_bytes: u64,
    /// Trailing lines inspected when allocating the id
    #[arg(
        long,
        default_value_t = statekit_journal::tail::DEFAULT_MAX_LINES,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub tail_lines: usize,
    #[command(flatten)]
    pub log: LogArgs,
}

/// Appends the event and returns the assigned id.
pub fn run(cli: Cli) -> Result<u64, Box<dyn std::error::Error>> {
    let data = read_data(&cli)?;
    let timestamp = cli
        .timestamp
        .unwrap_or_else(|| Local::now().to_rfc3339_opts(SecondsFormat::Micros, false));

    let options = WriteOptions {
        sync: cli.sync,
        create_dirs: true,
        tail: TailScanOptions {
            window_bytes: cli.tail_bytes,
            max_lines: cli.tail_lines,
        },
    };

    let request = AppendRequest::new(cli.event, timestamp)
        .with_kind(cli.kind)
        .with_data(data);

    let id = append_event(&cli.journal, request, &options).map_err(|e| {
        format!(
            "Failed to append event to journal: {}: {}",
            cli.journal.display(),
            e
        )
    })?;

    info!(id, journal = %cli.journal.display(), "appended event");
    Ok(id)
}

fn read_data(cli: &Cli) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(raw) = &cli.data_json {
        let value = serde_json::from_str(raw)
            .map_err(|e| format!("Invalid JSON in --data-json: {}", e))?;
        return Ok(value);
    }

    if let Some(path) = &cli.data_file {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Failed to read file {}: {}", path.display(), e))?;
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
        let value = serde_json::from_slice(bytes)
            .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;
        return Ok(value);
    }

    Ok(Value::Object(serde_json::Map::new()))
}
