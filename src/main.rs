//! # ccgen CLI Entry Point
//!
//! This is the main executable for the `compile_commands` command-line tool.
//! It parses CLI arguments using clap and routes them to the handlers in
//! [`ccgen::commands`].
//!
//! ## Modes
//!
//! - **Generate**: `compile_commands -r <DIR> [flags]`
//! - **Reuse**: `compile_commands -r <DIR> --reuse`
//! - **History**: `compile_commands --list-history`

use clap::Parser;

use ccgen::cli::Cli;
use ccgen::commands;
use ccgen::ui;

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let cli = Cli::parse_from(&argv);

    if let Err(e) = commands::run(&cli, argv.get(1..).unwrap_or_default()) {
        ui::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
