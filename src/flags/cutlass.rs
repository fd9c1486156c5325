use std::path::Path;

/// Include folders of a CUTLASS checkout, relative to its root.
pub const INCLUDE_DIRS: &[&str] = &["include", "tools/util/include", "examples/common"];

/// `-I` flags for every CUTLASS include folder, plus the folders that were
/// not found. Missing folders are reported but their flags are still emitted.
pub fn include_flags(root: &Path) -> (Vec<String>, Vec<String>) {
    let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let mut flags = Vec::new();
    let mut missing = Vec::new();

    for rel in INCLUDE_DIRS {
        let dir = rel.split('/').fold(root.clone(), |acc, part| acc.join(part));
        if !dir.is_dir() {
            missing.push(rel.to_string());
        }
        flags.push(format!("-I{}", dir.display()));
    }

    (flags, missing)
}
