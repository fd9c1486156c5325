//! Persisting the compile database.

use crate::synth::CompileEntry;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const OUTPUT_FILE: &str = "compile_commands.json";

/// Serialize `entries` to `<dir>/compile_commands.json` and return its path.
pub fn write_compile_commands(dir: &Path, entries: &[CompileEntry]) -> Result<PathBuf> {
    let mut json = serde_json::to_string_pretty(entries)?;
    json.push('\n');

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(OUTPUT_FILE);
    write_atomic(&path, json.as_bytes())?;
    Ok(path)
}

/// Write to a sibling temp file, then rename over `path`, so readers only
/// ever see the old or the new content.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    let tmp = path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to write {}", tmp.display()));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
    }
    Ok(())
}
