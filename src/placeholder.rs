//! Placeholder unit for header-only trees.
//!
//! clangd needs at least one entry to pick up include flags. When the scan
//! finds nothing, a tiny CUDA file outside the project stands in for it.

use crate::scan::{Language, SourceFile};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const PLACEHOLDER_NAME: &str = "placeholder.cu";

const PLACEHOLDER_CONTENT: &str = "// Generated by compile_commands as an indexing anchor for header-only projects. Do not edit.\n";

/// Returns the (possibly substituted) file list and whether the placeholder
/// was used. An existing placeholder is reused untouched.
pub fn ensure_placeholder(
    files: Vec<SourceFile>,
    placeholder_dir: &Path,
) -> Result<(Vec<SourceFile>, bool)> {
    if !files.is_empty() {
        return Ok((files, false));
    }

    fs::create_dir_all(placeholder_dir).with_context(|| {
        format!(
            "Failed to create placeholder directory {}",
            placeholder_dir.display()
        )
    })?;

    let path = placeholder_dir.join(PLACEHOLDER_NAME);
    match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(_) => {
            fs::write(&path, PLACEHOLDER_CONTENT)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create {}", path.display()));
        }
    }

    let path = fs::canonicalize(&path).unwrap_or(path);
    Ok((
        vec![SourceFile {
            path,
            language: Language::Cuda,
        }],
        true,
    ))
}
