//! Per-project command history.
//!
//! Remembers, for each project root, the exact arguments of the last
//! successful run so `--reuse` can replay them. The file is a JSON array of
//! `{ "root": ..., "args": [...] }` records and is rewritten atomically on
//! every change.

use crate::config::normalize_root;
use crate::error::Error;
use crate::output::write_atomic;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub root: PathBuf,
    pub args: Vec<String>,
}

impl HistoryRecord {
    /// The recorded invocation as a single command line.
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Load the store at `path`; a missing file is an empty history.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| Error::CorruptHistory {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(Error::IoError(e)),
        };
        Ok(Self { path, records })
    }

    /// Insert or replace the record for `root` and persist before returning.
    /// A replaced record keeps its position in the listing.
    pub fn record(&mut self, root: &Path, args: &[String]) -> Result<()> {
        let root = normalize_root(root);
        match self.records.iter_mut().find(|r| r.root == root) {
            Some(existing) => existing.args = args.to_vec(),
            None => self.records.push(HistoryRecord {
                root,
                args: args.to_vec(),
            }),
        }
        self.save()
    }

    pub fn lookup(&self, root: &Path) -> Option<&[String]> {
        let root = normalize_root(root);
        self.records
            .iter()
            .find(|r| r.root == root)
            .map(|r| r.args.as_slice())
    }

    /// Like [`lookup`](Self::lookup), but a missing record is an error.
    pub fn reuse(&self, root: &Path) -> Result<&[String], Error> {
        self.lookup(root)
            .ok_or_else(|| Error::NoHistory(normalize_root(root)))
    }

    pub fn list(&self) -> &[HistoryRecord] {
        &self.records
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut json = serde_json::to_string_pretty(&self.records)?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to save history to {}", self.path.display()))
    }
}
