//! Generate command handler
//!
//! Handles a plain `compile_commands -r <DIR> ...` run.

use anyhow::{Context, Result};
use colored::*;

use crate::cli::{Cli, anchor_paths};
use crate::config::Settings;
use crate::history::HistoryStore;
use crate::pipeline::{self, Generation};
use crate::toolchain::SystemProbe;
use crate::ui;

/// Generate the database, then remember `args` for the project root.
/// Relative directory arguments are recorded as absolute paths.
pub fn run(
    cli: &Cli,
    settings: &Settings,
    store: &mut HistoryStore,
    args: &[String],
) -> Result<()> {
    let generation = execute(cli, settings)?;
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    store.record(&generation.root, &anchor_paths(args, &cwd))?;
    Ok(())
}

/// Build the config from `cli`, run the pipeline and report the outcome.
/// Nothing is recorded here.
pub fn execute(cli: &Cli, settings: &Settings) -> Result<Generation> {
    let config = cli.project_config(settings)?;
    let probe = SystemProbe::new(settings.probe_timeout());

    ui::info(format!("Scanning {}", config.root.display()));
    let generation = pipeline::generate(&config, &probe)?;

    for warning in &generation.warnings {
        ui::warn(warning);
    }
    if cli.verbose {
        print_details(&generation);
    }

    ui::success(format!(
        "compile_commands.json generated at: {}",
        generation.output_path.display().to_string().bold()
    ));
    ui::detail("Entries", generation.entries.len());
    Ok(generation)
}

fn print_details(generation: &Generation) {
    let tc = &generation.toolchain;

    println!("{}", "CUDA toolchain".bold());
    match &tc.compiler_path {
        Some(path) => ui::detail("Compiler", path.display()),
        None => ui::detail("Compiler", "not found".yellow()),
    }
    if let Some(version) = &tc.version {
        ui::detail("Version", version);
    }
    if let Some(path) = &tc.install_path {
        ui::detail("Install", path.display());
    }
    match &tc.compute_capability {
        Some(cc) => ui::detail("GPU", format!("compute {} ({})", cc.dotted(), cc.sm())),
        None => ui::detail("GPU", "not detected".yellow()),
    }

    for (title, flags) in [
        ("C/C++ flags", &generation.cpp_flags),
        ("CUDA flags", &generation.cuda_flags),
    ] {
        println!("{}", title.bold());
        if flags.is_empty() {
            println!("   {}", "(none)".dimmed());
        }
        for flag in flags.flags() {
            println!("   {} {}", flag.token, format!("[{}]", flag.origin).dimmed());
        }
    }
}
