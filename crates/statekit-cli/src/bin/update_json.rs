//! update-json - patch a JSON file in place via dotted-path assignments.

use clap::Parser;
use statekit_cli::commands::update::{run, Cli};
use statekit_cli::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
