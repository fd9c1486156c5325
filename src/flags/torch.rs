//! PyTorch C++ extension headers, located through the active interpreter.

use crate::toolchain::Probe;
use std::path::{Path, PathBuf};

const INTERPRETERS: &[&str] = &["python3", "python"];
const PATHS_SCRIPT: &str =
    "import sysconfig; p = sysconfig.get_paths(); print(p['purelib']); print(p['include'])";

/// Headers shipped inside the `torch` package, relative to it.
const TORCH_SUBDIRS: &[&str] = &[
    "",
    "include",
    "include/torch/csrc/api/include",
    "include/TH",
    "include/THC",
];

pub fn include_flags(probe: &dyn Probe) -> Result<Vec<String>, String> {
    let python = INTERPRETERS
        .iter()
        .find_map(|name| probe.locate(name))
        .ok_or_else(|| "no python interpreter on PATH".to_string())?;

    let out = probe
        .run(&python, &["-c", PATHS_SCRIPT])
        .map_err(|e| format!("{} {}", python.display(), e))?;
    let (purelib, include) = parse_paths(&out)
        .ok_or_else(|| "unexpected sysconfig output".to_string())?;

    let torch = purelib.join("torch");
    if !torch.is_dir() {
        return Err(format!("torch not installed under {}", purelib.display()));
    }

    let mut flags: Vec<String> = TORCH_SUBDIRS
        .iter()
        .map(|rel| format!("-I{}", join_rel(&torch, rel).display()))
        .collect();
    flags.push(format!("-I{}", include.display()));
    Ok(flags)
}

fn parse_paths(out: &str) -> Option<(PathBuf, PathBuf)> {
    let mut lines = out.lines().map(str::trim).filter(|l| !l.is_empty());
    let purelib = PathBuf::from(lines.next()?);
    let include = PathBuf::from(lines.next()?);
    Some((purelib, include))
}

fn join_rel(base: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|p| !p.is_empty())
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}
