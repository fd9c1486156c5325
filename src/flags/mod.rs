//! Per-language flag resolution.
//!
//! The C++ set is the user's tokens plus any Torch/CUTLASS includes. The
//! CUDA set is the user's CUDA tokens, then (when include sharing is on)
//! every C++ include it does not have yet (a split `-I dir` pair is passed
//! on as `-Idir`), then whatever detection produced.
//! `-I` tokens are unique within a set, first occurrence wins; all other
//! tokens are kept exactly as given, duplicates included.

pub mod cutlass;
pub mod torch;

use crate::config::ProjectConfig;
use crate::toolchain::{CudaToolchain, Probe};
use std::fmt;

/// Where a token came from. Only used for `--verbose` diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Inherited,
    Torch,
    Cutlass,
    Detected,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Origin::User => "user",
            Origin::Inherited => "inherited",
            Origin::Torch => "torch",
            Origin::Cutlass => "cutlass",
            Origin::Detected => "detected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub token: String,
    pub origin: Origin,
}

fn is_include(token: &str) -> bool {
    token.len() > 2 && token.starts_with("-I")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token; a `-I` already present is dropped.
    pub fn push(&mut self, token: impl Into<String>, origin: Origin) {
        let token = token.into();
        if is_include(&token) && self.contains(&token) {
            return;
        }
        self.flags.push(Flag { token, origin });
    }

    pub fn extend<I, S>(&mut self, tokens: I, origin: Origin)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            self.push(token, origin);
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.flags.iter().any(|f| f.token == token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|f| f.token.as_str())
    }

    /// Include directories in joined `-Idir` form. A split `-I dir` pair
    /// counts as one include.
    pub fn includes(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut tokens = self.tokens();
        while let Some(token) = tokens.next() {
            if is_include(token) {
                out.push(token.to_string());
            } else if token == "-I" {
                if let Some(dir) = tokens.next() {
                    out.push(format!("-I{}", dir));
                }
            }
        }
        out
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    pub cpp: FlagSet,
    pub cuda: FlagSet,
    pub warnings: Vec<String>,
}

pub fn reconcile(
    config: &ProjectConfig,
    toolchain: &CudaToolchain,
    probe: &dyn Probe,
) -> Reconciled {
    let mut out = Reconciled::default();

    out.cpp.extend(config.cpp_args.iter().cloned(), Origin::User);
    if config.require_torch {
        match torch::include_flags(probe) {
            Ok(flags) => out.cpp.extend(flags, Origin::Torch),
            Err(reason) => out
                .warnings
                .push(format!("Failed to detect PyTorch headers: {}", reason)),
        }
    }
    if let Some(root) = &config.cutlass_root {
        let (flags, missing) = cutlass::include_flags(root);
        if !missing.is_empty() {
            out.warnings.push(format!(
                "CUTLASS root {} is missing expected directories: {}",
                root.display(),
                missing.join(", ")
            ));
        }
        out.cpp.extend(flags, Origin::Cutlass);
    }

    out.cuda.extend(config.cuda_args.iter().cloned(), Origin::User);
    if config.shares_includes() {
        let inherited = out.cpp.includes();
        out.cuda.extend(inherited, Origin::Inherited);
    }
    out.cuda.extend(detected_cuda_flags(toolchain), Origin::Detected);

    out
}

/// Flags derived from detection. Each group depends only on its own fact.
pub fn detected_cuda_flags(tc: &CudaToolchain) -> Vec<String> {
    let mut flags = Vec::new();

    if let Some(path) = &tc.install_path {
        flags.push(format!("--cuda-path={}", path.display()));
        flags.push(format!("-I{}", path.join("include").display()));
    }
    if let Some(cc) = &tc.compute_capability {
        flags.push(format!("--cuda-gpu-arch={}", cc.sm()));
        flags.push(format!("-D__CUDA_ARCH__={}", cc.arch_macro()));
        flags.push(format!("-D__CUDA_ARCH_LIST__={}", cc.arch_macro()));
    }
    if let Some(v) = &tc.version {
        flags.push(format!("-D__CUDACC_VER_MAJOR__={}", v.major));
        flags.push(format!("-D__CUDACC_VER_MINOR__={}", v.minor));
        if let Some(build) = v.build {
            flags.push(format!("-D__CUDACC_VER_BUILD__={}", build));
        }
        flags.push(format!("-D__CUDA_API_VER_MAJOR__={}", v.major));
        flags.push(format!("-D__CUDA_API_VER_MINOR__={}", v.minor));
    }
    if tc.available {
        flags.extend(
            [
                "-D__NVCC__",
                "-D__NV_LEGACY_LAUNCH",
                "-D__NVCC_DIAG_PRAGMA_SUPPORT__=1",
                "-D__CUDA_INCLUDE_COMPILER_INTERNAL_HEADERS__",
            ]
            .map(String::from),
        );
    }
    flags.push("-D__CUDACC__".to_string());

    flags
}
