//! Run configuration.
//!
//! Two layers feed a generation run:
//!
//! - [`Settings`]: optional user defaults from `<app dir>/config.toml`
//! - [`ProjectConfig`]: the frozen per-run configuration built from the CLI
//!   (or from a replayed history record) merged with those defaults
//!
//! The app directory is `$CCGEN_HOME` when set, otherwise
//! `~/.config/compile_commands_generator`.

use crate::error::Error;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CPP_SUFFIXES: &[&str] = &[".c", ".cc", ".cpp", ".cxx"];
pub const DEFAULT_CUDA_SUFFIXES: &[&str] = &[".cu"];

const APP_DIR_ENV: &str = "CCGEN_HOME";
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Directory holding history, settings and the default placeholder.
pub fn app_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(APP_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("compile_commands_generator")
}

/// User defaults read from `config.toml`. Every field is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub placeholder_dir: Option<PathBuf>,
    pub probe_timeout_secs: Option<u64>,
    /// Ignore patterns applied on every run, after the CLI ones
    pub ignore: Vec<String>,
    pub extra_cpp_suffixes: Vec<String>,
    pub extra_cuda_suffixes: Vec<String>,
    #[serde(skip)]
    home: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&app_dir())
    }

    pub fn load_from(home: &Path) -> Result<Self> {
        let path = home.join("config.toml");
        let mut settings = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };
        settings.home = home.to_path_buf();
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn history_file(&self) -> PathBuf {
        self.home.join("history.json")
    }

    pub fn default_placeholder_dir(&self) -> PathBuf {
        self.placeholder_dir
            .clone()
            .unwrap_or_else(|| self.home.join("placeholder_DO_NOT_EDIT"))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS))
    }
}

/// Everything one generation run needs. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub cpp_args: Vec<String>,
    pub cuda_args: Vec<String>,
    pub cuda_inherits_cpp: bool,
    pub ignore: Vec<String>,
    pub cpp_suffixes: Vec<String>,
    pub cuda_suffixes: Vec<String>,
    pub require_torch: bool,
    pub cutlass_root: Option<PathBuf>,
    pub placeholder_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl ProjectConfig {
    /// Start a config for `root` with default suffixes and no extra flags.
    ///
    /// The root must be an existing directory; it is stored canonicalized.
    pub fn new(root: &Path, placeholder_dir: PathBuf) -> Result<Self, Error> {
        let root = canonical_dir(root)?;
        Ok(Self {
            output_dir: root.clone(),
            root,
            cpp_args: Vec::new(),
            cuda_args: Vec::new(),
            cuda_inherits_cpp: true,
            ignore: Vec::new(),
            cpp_suffixes: DEFAULT_CPP_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            cuda_suffixes: DEFAULT_CUDA_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            require_torch: false,
            cutlass_root: None,
            placeholder_dir: absolutize(&placeholder_dir),
        })
    }

    pub fn with_extra_cpp_suffixes<I: IntoIterator<Item = String>>(mut self, extra: I) -> Self {
        extend_suffixes(&mut self.cpp_suffixes, extra);
        self
    }

    pub fn with_extra_cuda_suffixes<I: IntoIterator<Item = String>>(mut self, extra: I) -> Self {
        extend_suffixes(&mut self.cuda_suffixes, extra);
        self
    }

    /// Write `compile_commands.json` somewhere other than the root.
    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.output_dir = absolutize(dir);
        self
    }

    pub fn with_cpp_args(mut self, args: Vec<String>) -> Self {
        self.cpp_args = args;
        self
    }

    pub fn with_cuda_args(mut self, args: Vec<String>) -> Self {
        self.cuda_args = args;
        self
    }

    pub fn with_cuda_inherits_cpp(mut self, inherit: bool) -> Self {
        self.cuda_inherits_cpp = inherit;
        self
    }

    /// Ignore patterns, matched in the given order.
    pub fn with_ignore(mut self, patterns: Vec<String>) -> Self {
        self.ignore = patterns;
        self
    }

    pub fn with_torch(mut self, require: bool) -> Self {
        self.require_torch = require;
        self
    }

    pub fn with_cutlass_root(mut self, root: Option<&Path>) -> Self {
        self.cutlass_root = root.map(absolutize);
        self
    }

    /// Torch or CUTLASS headers only make sense if CUDA sees them too.
    pub fn shares_includes(&self) -> bool {
        self.cuda_inherits_cpp || self.require_torch || self.cutlass_root.is_some()
    }
}

fn extend_suffixes<I: IntoIterator<Item = String>>(suffixes: &mut Vec<String>, extra: I) {
    for suffix in extra {
        let suffix = suffix.trim();
        if suffix.is_empty() || suffix == "." {
            continue;
        }
        let suffix = if suffix.starts_with('.') {
            suffix.to_string()
        } else {
            format!(".{}", suffix)
        };
        if !suffixes.contains(&suffix) {
            suffixes.push(suffix);
        }
    }
}

fn canonical_dir(root: &Path) -> Result<PathBuf, Error> {
    match fs::canonicalize(root) {
        Ok(path) if path.is_dir() => Ok(path),
        _ => Err(Error::InvalidRoot(absolutize(root))),
    }
}

/// Key under which a project root is stored in the history.
///
/// Existing directories are canonicalized (symlinks resolved). Anything else
/// is made absolute against the working directory and lexically cleaned, so
/// `proj/`, `./proj` and `proj` agree even when the path is gone.
pub fn normalize_root(root: &Path) -> PathBuf {
    fs::canonicalize(root).unwrap_or_else(|_| absolutize(root))
}

fn absolutize(path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    absolutize_from(&cwd, path)
}

/// Resolve `path` against `base` and drop `.`/`..` lexically.
pub fn absolutize_from(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut clean = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other.as_os_str()),
        }
    }
    clean
}
