//! CLI command handlers
//!
//! `main` parses arguments and hands them to [`run`], which opens the
//! history store and routes to the matching handler.

pub mod generate;
pub mod history;

use anyhow::Result;

use crate::cli::Cli;
use crate::config::Settings;
use crate::history::HistoryStore;

/// Dispatch one invocation. `args` is the raw argument list without the
/// program name; it is what gets recorded for `--reuse`.
pub fn run(cli: &Cli, args: &[String]) -> Result<()> {
    let settings = Settings::load()?;
    let mut store = HistoryStore::open(settings.history_file())?;

    if cli.list_history {
        history::list(&store);
        return Ok(());
    }
    if cli.reuse {
        return history::reuse(cli, &settings, &store);
    }
    generate::run(cli, &settings, &mut store, args)
}
