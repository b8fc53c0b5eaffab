//! Extract command implementation.

use crate::logging::LogArgs;
use crate::output;
use clap::Parser;
use statekit_extract::{extract_last_json, ExtractError};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

/// Print the last complete JSON value found in a text file
#[derive(Parser, Debug)]
#[command(name = "extract-json")]
pub struct Cli {
    /// Input transcript ("-" reads stdin)
    pub input: String,
    /// Write the value here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Indent output by two spaces
    #[arg(long)]
    pub pretty: bool,
    #[command(flatten)]
    pub log: LogArgs,
}

/// Extracts the value and writes it to the requested destination.
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = render(&cli)?;
    match &cli.output {
        Some(path) => output::write_with_newline(path, &rendered)
            .map_err(|e| format!("Failed to write output file {}: {}", path.display(), e))?,
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Reads the input and returns the formatted value without writing it.
pub fn render(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = if cli.input == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        buffer
    } else {
        std::fs::read(&cli.input)
            .map_err(|e| format!("Failed to read file {}: {}", cli.input, e))?
    };

    let found = extract_last_json(&bytes).map_err(|e| match e {
        ExtractError::NotFound => format!("No JSON found in {}", cli.input),
    })?;
    info!(
        encoding = %found.encoding,
        start = found.span.start,
        end = found.span.end,
        "extracted JSON value"
    );

    Ok(output::format_json(&found.value, cli.pretty)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("extract-json").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_render_compact() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("transcript.txt");
        fs::write(&input, "Answer follows.\n{\"b\": 2, \"a\": [1]}\nEnd.").unwrap();

        let rendered = render(&cli(&[input.to_str().unwrap()])).unwrap();
        assert_eq!(rendered, r#"{"b":2,"a":[1]}"#);
    }

    #[test]
    fn test_output_file_pretty() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("transcript.txt");
        let output = temp.path().join("out").join("result.json");
        fs::write(&input, "x [1] y").unwrap();

        run(cli(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--pretty",
        ]))
        .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "[\n  1\n]\n");
    }

    #[test]
    fn test_no_json_names_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("plain.txt");
        fs::write(&input, "nothing structured here").unwrap();
        let input_str = input.to_str().unwrap();

        let err = render(&cli(&[input_str])).unwrap_err().to_string();
        assert_eq!(err, format!("No JSON found in {}", input_str));
    }
}
