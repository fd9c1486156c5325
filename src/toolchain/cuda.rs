//! CUDA toolchain detection.
//!
//! The compiler and the GPU are probed independently: a machine without
//! `nvcc` can still report its compute capability and vice versa. Every
//! extractor returns `Option` so one tool's odd output cannot poison the
//! other facts.

use super::probe::Probe;
use super::types::{ComputeCapability, CudaToolchain, CudaVersion};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const NVCC: &str = "nvcc";
pub const NVIDIA_SMI: &str = "nvidia-smi";

const GPU_QUERY: &[&str] = &[
    "--id=0",
    "--query-gpu=compute_cap",
    "--format=csv,noheader",
];

// Cuda compilation tools, release 12.6, V12.6.20
static RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"release\s+(\d+)\.(\d+)").expect("valid regex"));
static BUILD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bV(\d+)\.(\d+)\.(\d+)").expect("valid regex"));
static CAPABILITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\.(\d+)\s*$").expect("valid regex"));

pub fn detect(probe: &dyn Probe) -> CudaToolchain {
    let mut tc = CudaToolchain::unavailable();

    match probe.locate(NVCC) {
        Some(nvcc) => match probe.run(&nvcc, &["--version"]) {
            Ok(out) => {
                tc.available = true;
                tc.version = parse_version(&out);
                if tc.version.is_none() {
                    tc.warnings
                        .push("Could not parse nvcc version output".to_string());
                }
                tc.install_path = install_path(&nvcc);
                if tc.install_path.is_none() {
                    tc.warnings.push(format!(
                        "Could not derive CUDA install path from {}",
                        nvcc.display()
                    ));
                }
                tc.compiler_path = Some(nvcc);
            }
            // A compiler that cannot run contributes nothing.
            Err(e) => tc.warnings.push(format!(
                "nvcc --version {}; skipping CUDA compiler flags",
                e
            )),
        },
        None => tc
            .warnings
            .push("nvcc not found on PATH; skipping CUDA compiler flags".to_string()),
    }

    match probe.locate(NVIDIA_SMI) {
        Some(smi) => match probe.run(&smi, GPU_QUERY) {
            Ok(out) => {
                tc.compute_capability = parse_compute_capability(&out);
                if tc.compute_capability.is_none() {
                    tc.warnings.push(
                        "Could not parse compute capability from nvidia-smi output".to_string(),
                    );
                }
            }
            Err(e) => tc.warnings.push(format!("nvidia-smi query {}", e)),
        },
        None => tc
            .warnings
            .push("nvidia-smi not found on PATH; skipping GPU arch flags".to_string()),
    }

    tc
}

/// Release and build are matched separately; a missing build number
/// still yields a usable version.
pub fn parse_version(output: &str) -> Option<CudaVersion> {
    let caps = RELEASE_RE.captures(output)?;
    let major = caps[1].parse().ok()?;
    let minor = caps[2].parse().ok()?;
    let build = BUILD_RE
        .captures(output)
        .and_then(|c| c[3].parse().ok());
    Some(CudaVersion {
        major,
        minor,
        build,
    })
}

/// First GPU only: the first non-empty line must be `major.minor`.
pub fn parse_compute_capability(output: &str) -> Option<ComputeCapability> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let caps = CAPABILITY_RE.captures(line)?;
    Some(ComputeCapability {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
    })
}

/// `<install>/bin/nvcc` -> `<install>`, after resolving symlinks such as
/// `/usr/local/cuda -> /usr/local/cuda-12.6`.
pub fn install_path(nvcc: &Path) -> Option<PathBuf> {
    let resolved = std::fs::canonicalize(nvcc).unwrap_or_else(|_| nvcc.to_path_buf());
    let bin = resolved.parent()?;
    if bin.file_name()? != "bin" {
        return None;
    }
    bin.parent().map(Path::to_path_buf)
}
