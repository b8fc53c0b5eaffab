//! extract-json - print the last JSON value embedded in a transcript.

use clap::Parser;
use statekit_cli::commands::extract::{run, Cli};
use statekit_cli::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
