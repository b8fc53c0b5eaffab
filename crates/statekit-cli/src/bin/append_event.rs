//! append-event - append a numbered event to a JSON-lines journal.

use clap::Parser;
use statekit_cli::commands::append::{run, Cli};
use statekit_cli::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);

    match run(cli) {
        Ok(id) => println!("{}", id),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
