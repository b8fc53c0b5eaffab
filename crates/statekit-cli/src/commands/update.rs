//! Update command implementation.

use crate::logging::LogArgs;
use clap::Parser;
use statekit_patch::{apply, load_document, save_document, Assignment};
use std::path::PathBuf;
use tracing::info;

/// Set values inside a JSON file by dotted key path
#[derive(Parser, Debug)]
#[command(name = "update-json")]
pub struct Cli {
    /// JSON file to update (a missing file starts as an empty object)
    pub file: PathBuf,
    /// Assignment such as `a.b.c=5`; may be repeated
    #[arg(long = "set", value_name = "KEY=JSON")]
    pub sets: Vec<Assignment>,
    /// Indent output by two spaces
    #[arg(long)]
    pub pretty: bool,
    #[command(flatten)]
    pub log: LogArgs,
}

/// Applies every assignment in order and writes the file back.
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = load_document(&cli.file)
        .map_err(|e| format!("Failed to load {}: {}", cli.file.display(), e))?;

    for assignment in &cli.sets {
        apply(&mut doc, assignment)
            .map_err(|e| format!("Failed to set {}: {}", assignment.path, e))?;
    }

    save_document(&cli.file, &doc, cli.pretty)
        .map_err(|e| format!("Failed to write {}: {}", cli.file.display(), e))?;

    info!(file = %cli.file.display(), assignments = cli.sets.len(), "updated JSON file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("update-json").chain(args.iter().copied()))
    }

    #[test]
    fn test_set_then_overwrite() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("state.json");
        let file_str = file.to_str().unwrap();

        run(cli(&[file_str, "--set", "a.b.c=5"]).unwrap()).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "{\"a\":{\"b\":{\"c\":5}}}\n");

        run(cli(&[file_str, "--set", "a.b=7"]).unwrap()).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "{\"a\":{\"b\":7}}\n");
    }

    #[test]
    fn test_multiple_sets_keep_insertion_order() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("state.json");
        fs::write(&file, "{\"z\": 0}").unwrap();

        run(cli(&[
            file.to_str().unwrap(),
            "--set",
            "y=\"s\"",
            "--set",
            "x.list=[1,2]",
        ])
        .unwrap())
        .unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "{\"z\":0,\"y\":\"s\",\"x\":{\"list\":[1,2]}}\n"
        );
    }

    #[test]
    fn test_missing_equals_is_usage_error() {
        let err = cli(&["state.json", "--set", "a.b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn test_non_object_root_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("state.json");
        fs::write(&file, "[1]").unwrap();

        let result = run(cli(&[file.to_str().unwrap(), "--set", "a=1"]).unwrap());
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), "[1]");
    }
}
