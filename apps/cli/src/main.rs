//! worldcontext CLI — summarise a denizen catalogue as markdown.
//!
//! Reads a JSON array of denizen records from a file or standard input and
//! prints the world context consumed by the generation step.

mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::Cli;

fn main() -> ExitCode {
    if let Err(status) = commands::install_report_hook() {
        return ExitCode::from(status);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match commands::usage_error(&e) {
            Some(line) => {
                eprintln!("{line}");
                return ExitCode::from(commands::FAILURE_STATUS);
            }
            // --help and --version
            None => e.exit(),
        },
    };
    commands::init_tracing(&cli);

    ExitCode::from(commands::finish(commands::run(cli)))
}
