//! History command handlers
//!
//! Handles `--list-history` and `--reuse`.

use anyhow::Result;
use colored::*;

use crate::cli::Cli;
use crate::config::{Settings, normalize_root};
use crate::error::Error;
use crate::history::HistoryStore;
use crate::ui;

use super::generate;

pub fn list(store: &HistoryStore) {
    if store.list().is_empty() {
        ui::info("No history recorded yet.");
        return;
    }

    let mut table = ui::Table::new(&["Project", "Last command"]);
    for record in store.list() {
        table.add_row(vec![
            record.root.display().to_string().bold().green().to_string(),
            record.command_line(),
        ]);
    }
    table.print();
}

/// Replay the recorded arguments for `--root`. The record is left as is.
pub fn reuse(cli: &Cli, settings: &Settings, store: &HistoryStore) -> Result<()> {
    let root = cli.root.as_deref().ok_or(Error::MissingRoot)?;
    let key = normalize_root(root);
    let args = store.reuse(&key)?;

    ui::info(format!("Reusing last command for {}", key.display()));
    ui::detail("Command", args.join(" "));

    let mut replay = Cli::replay(&key, args)?;
    replay.verbose |= cli.verbose;
    generate::execute(&replay, settings)?;
    Ok(())
}
