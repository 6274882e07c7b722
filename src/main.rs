//! worldmap - Command-line tool for rendering world saves to PNG maps

use std::process::ExitCode;

use worldmap::cli;

fn main() -> ExitCode {
    cli::run()
}
