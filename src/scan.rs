//! Source discovery.
//!
//! Walks the project root, drops ignored paths and classifies what is left
//! by suffix. Directory entries are visited in file-name order so the same
//! tree always yields the same sequence.

use crate::ignore::{self, IgnoreSet};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Cpp,
    Cuda,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Cpp => write!(f, "C++"),
            Language::Cuda => write!(f, "CUDA"),
        }
    }
}

/// A discovered compilation unit.
///
/// `path` is relative to the project root, except for units living outside
/// it (the placeholder), which carry an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub files: Vec<SourceFile>,
    pub warnings: Vec<String>,
}

/// Pick a language by the longest registered suffix of `file_name`.
/// A suffix registered for both languages resolves to CUDA.
pub fn classify<S: AsRef<str>>(
    file_name: &str,
    cpp_suffixes: &[S],
    cuda_suffixes: &[S],
) -> Option<Language> {
    let longest = |suffixes: &[S]| {
        suffixes
            .iter()
            .map(|s| s.as_ref())
            .filter(|s: &&str| !s.is_empty() && file_name.ends_with(*s))
            .map(|s| s.len())
            .max()
    };

    match (longest(cpp_suffixes), longest(cuda_suffixes)) {
        (Some(cpp), Some(cuda)) if cpp > cuda => Some(Language::Cpp),
        (_, Some(_)) => Some(Language::Cuda),
        (Some(_), None) => Some(Language::Cpp),
        (None, None) => None,
    }
}

pub fn scan<S: AsRef<str>>(
    root: &Path,
    cpp_suffixes: &[S],
    cuda_suffixes: &[S],
    ignore: &IgnoreSet,
) -> ScanReport {
    let mut report = ScanReport::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.warnings.push(describe_walk_error(root, &e));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if ignore.is_ignored(&ignore::to_slash(relative)) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if let Some(language) = classify(&file_name, cpp_suffixes, cuda_suffixes) {
            report.files.push(SourceFile {
                path: relative.to_path_buf(),
                language,
            });
        }
    }

    report
}

fn describe_walk_error(root: &Path, e: &walkdir::Error) -> String {
    let shown = e
        .path()
        .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string());

    if let Some(ancestor) = e.loop_ancestor() {
        format!(
            "Skipping symlink loop at {} (points back to {})",
            shown,
            ancestor.display()
        )
    } else if let Some(io) = e.io_error() {
        format!("Skipping unreadable path {}: {}", shown, io)
    } else {
        format!("Skipping {}: {}", shown, e)
    }
}
