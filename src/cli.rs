//! Command-line surface.
//!
//! The same definition parses both a live invocation and a replayed
//! history record, so anything accepted today can be reused tomorrow.

use crate::config::{ProjectConfig, Settings, absolutize_from};
use crate::error::Error;
use clap::Parser;
use std::path::{Path, PathBuf};

pub const BIN_NAME: &str = "compile_commands";

/// Long options (and aliases) whose value is a directory. `--root` is not
/// here; replay pins it to the history key.
const PATH_OPTIONS: &[&str] = &["--output-dir", "--placeholder-dir", "--cutlass-root", "--cr"];

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = BIN_NAME)]
#[command(
    about = "Generate compile_commands.json for C/C++/CUDA projects",
    version = env!("CARGO_PKG_VERSION")
)]
#[command(long_about = None)]
pub struct Cli {
    /// Project directory to scan
    #[arg(short, long, value_name = "DIR", required_unless_present = "list_history")]
    pub root: Option<PathBuf>,

    /// Extra C/C++ flags, comma-separated (e.g. -std=c++17,-Iinclude)
    #[arg(
        long,
        visible_alias = "cc",
        value_name = "ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub cpp_args: Vec<String>,

    /// Extra CUDA flags, comma-separated
    #[arg(
        long,
        visible_alias = "cu",
        value_name = "ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub cuda_args: Vec<String>,

    /// Do not copy C++ include directories into CUDA commands
    #[arg(long, visible_alias = "nci")]
    pub no_cuda_inherit_cpp: bool,

    /// Add PyTorch C++ include directories from the active Python
    #[arg(long, visible_alias = "rt")]
    pub require_torch: bool,

    /// Root of a CUTLASS checkout to add to include paths
    #[arg(long, visible_alias = "cr", value_name = "DIR")]
    pub cutlass_root: Option<PathBuf>,

    /// Glob patterns of root-relative paths to skip, comma-separated
    #[arg(long, visible_alias = "igs", value_name = "GLOBS", value_delimiter = ',')]
    pub ignore_formats: Vec<String>,

    /// Additional suffixes treated as C/C++ sources
    #[arg(long, value_name = "SUFFIXES", value_delimiter = ',')]
    pub extra_cpp_suffixes: Vec<String>,

    /// Additional suffixes treated as CUDA sources
    #[arg(long, value_name = "SUFFIXES", value_delimiter = ',')]
    pub extra_cuda_suffixes: Vec<String>,

    /// Where to put the placeholder file for header-only projects
    #[arg(long, value_name = "DIR")]
    pub placeholder_dir: Option<PathBuf>,

    /// Write compile_commands.json here instead of the project root
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Re-run the last successful command recorded for --root
    #[arg(long, visible_alias = "rs", conflicts_with = "list_history")]
    pub reuse: bool,

    /// Show every recorded project and its last command
    #[arg(long, visible_alias = "lh")]
    pub list_history: bool,

    /// Print resolved flags and detected toolchain
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse a recorded argument list for `root`.
    ///
    /// The stored `--root` may have been relative to a directory we are no
    /// longer in, so the lookup key replaces it.
    pub fn replay(root: &Path, args: &[String]) -> Result<Self, Error> {
        let argv = std::iter::once(BIN_NAME.to_string()).chain(args.iter().cloned());
        let mut cli = Self::try_parse_from(argv).map_err(|e| Error::InvalidReplay {
            root: root.to_path_buf(),
            reason: first_line(&e.to_string()),
        })?;
        if cli.reuse || cli.list_history {
            return Err(Error::InvalidReplay {
                root: root.to_path_buf(),
                reason: "recorded command is not a generation run".to_string(),
            });
        }
        cli.root = Some(root.to_path_buf());
        Ok(cli)
    }

    /// Merge the arguments with user settings into a validated run config.
    pub fn project_config(&self, settings: &Settings) -> Result<ProjectConfig, Error> {
        let root = self.root.as_deref().ok_or(Error::MissingRoot)?;
        let placeholder_dir = self
            .placeholder_dir
            .clone()
            .unwrap_or_else(|| settings.default_placeholder_dir());

        let mut ignore = clean(&self.ignore_formats);
        ignore.extend(clean(&settings.ignore));

        let config = ProjectConfig::new(root, placeholder_dir)?
            .with_extra_cpp_suffixes(
                clean(&self.extra_cpp_suffixes)
                    .into_iter()
                    .chain(settings.extra_cpp_suffixes.iter().cloned()),
            )
            .with_extra_cuda_suffixes(
                clean(&self.extra_cuda_suffixes)
                    .into_iter()
                    .chain(settings.extra_cuda_suffixes.iter().cloned()),
            )
            .with_cpp_args(clean(&self.cpp_args))
            .with_cuda_args(clean(&self.cuda_args))
            .with_cuda_inherits_cpp(!self.no_cuda_inherit_cpp)
            .with_ignore(ignore)
            .with_torch(self.require_torch)
            .with_cutlass_root(self.cutlass_root.as_deref());

        Ok(match &self.output_dir {
            Some(dir) => config.with_output_dir(dir),
            None => config,
        })
    }
}

/// Make relative directory values in `args` absolute against `cwd`, so a
/// recorded invocation means the same thing from any working directory.
/// Handles both `--opt dir` and `--opt=dir`; every other token is kept as is.
pub fn anchor_paths(args: &[String], cwd: &Path) -> Vec<String> {
    let anchor = |value: &str| absolutize_from(cwd, Path::new(value)).display().to_string();

    let mut out = Vec::with_capacity(args.len());
    let mut tokens = args.iter();
    while let Some(token) = tokens.next() {
        if PATH_OPTIONS.contains(&token.as_str()) {
            out.push(token.clone());
            if let Some(value) = tokens.next() {
                out.push(anchor(value));
            }
            continue;
        }
        match token.split_once('=') {
            Some((option, value)) if PATH_OPTIONS.contains(&option) && !value.is_empty() => {
                out.push(format!("{}={}", option, anchor(value)));
            }
            _ => out.push(token.clone()),
        }
    }
    out
}

fn first_line(message: &str) -> String {
    let line = message.lines().next().unwrap_or_default();
    line.trim_start_matches("error: ").to_string()
}

/// Trim each item and drop the empty ones left by `a,,b` or a trailing comma.
fn clean(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
