//! Compile entry assembly.
//!
//! Pure string building: one entry per source, `directory` is the project
//! root and `file` is the path exactly as the scanner reported it.

use crate::flags::FlagSet;
use crate::scan::{Language, SourceFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CPP_COMPILER: &str = "g++";
pub const CUDA_COMPILER: &str = "nvcc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileEntry {
    pub directory: String,
    pub file: String,
    pub command: String,
}

pub fn compiler_for(language: Language) -> &'static str {
    match language {
        Language::Cpp => CPP_COMPILER,
        Language::Cuda => CUDA_COMPILER,
    }
}

pub fn synthesize(
    files: &[SourceFile],
    cpp: &FlagSet,
    cuda: &FlagSet,
    root: &Path,
) -> Vec<CompileEntry> {
    let directory = root.display().to_string();

    files
        .iter()
        .map(|source| {
            let flags = match source.language {
                Language::Cpp => cpp,
                Language::Cuda => cuda,
            };
            let file = source.path.display().to_string();

            let mut parts = Vec::with_capacity(flags.len() + 3);
            parts.push(compiler_for(source.language).to_string());
            parts.extend(flags.tokens().map(quote));
            parts.push("-c".to_string());
            parts.push(quote(&file));

            CompileEntry {
                directory: directory.clone(),
                file,
                command: parts.join(" "),
            }
        })
        .collect()
}

/// Single-quote a token if a shell-style splitter would otherwise break it.
pub fn quote(token: &str) -> String {
    let plain = !token.is_empty()
        && !token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | '$' | '`'));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}
