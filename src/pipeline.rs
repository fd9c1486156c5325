//! One generation run, start to finish.
//!
//! scan → detect → reconcile → placeholder → synthesize → write. Nothing
//! here prints; every degradation is collected into
//! [`Generation::warnings`] in the order it happened so the caller decides
//! how to show it.

use crate::config::ProjectConfig;
use crate::flags::{self, FlagSet};
use crate::ignore::IgnoreSet;
use crate::output;
use crate::placeholder;
use crate::scan;
use crate::synth::{self, CompileEntry};
use crate::toolchain::{self, CudaToolchain, Probe};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Generation {
    /// Canonical project root every entry is relative to
    pub root: PathBuf,
    pub output_path: PathBuf,
    pub entries: Vec<CompileEntry>,
    pub placeholder_used: bool,
    pub cpp_flags: FlagSet,
    pub cuda_flags: FlagSet,
    pub toolchain: CudaToolchain,
    pub warnings: Vec<String>,
}

pub fn generate(config: &ProjectConfig, probe: &dyn Probe) -> Result<Generation> {
    let mut warnings = Vec::new();

    let ignore = IgnoreSet::new(&config.ignore);
    for (pattern, reason) in ignore.invalid() {
        warnings.push(format!(
            "Ignore pattern '{}' is malformed and matches nothing: {}",
            pattern, reason
        ));
    }

    let report = scan::scan(
        &config.root,
        &config.cpp_suffixes,
        &config.cuda_suffixes,
        &ignore,
    );
    warnings.extend(report.warnings);

    let toolchain = toolchain::detect(probe);
    warnings.extend(toolchain.warnings.iter().cloned());

    let reconciled = flags::reconcile(config, &toolchain, probe);
    warnings.extend(reconciled.warnings);

    let (files, placeholder_used) =
        placeholder::ensure_placeholder(report.files, &config.placeholder_dir)?;
    if placeholder_used {
        warnings.push(format!(
            "No valid source files found in {}; using placeholder {}",
            config.root.display(),
            config.placeholder_dir.join(placeholder::PLACEHOLDER_NAME).display()
        ));
    }

    let entries = synth::synthesize(&files, &reconciled.cpp, &reconciled.cuda, &config.root);
    let output_path = output::write_compile_commands(&config.output_dir, &entries)?;

    Ok(Generation {
        root: config.root.clone(),
        output_path,
        entries,
        placeholder_used,
        cpp_flags: reconciled.cpp,
        cuda_flags: reconciled.cuda,
        toolchain,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::probe::fake::FakeProbe;
    use std::fs;
    use std::path::Path;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn project(files: &[&str]) -> (tempfile::TempDir, ProjectConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        fs::create_dir(&root).unwrap();
        for f in files {
            touch(&root, f);
        }
        let config = ProjectConfig::new(&root, dir.path().join("placeholder")).unwrap();
        (dir, config)
    }

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cpp_and_cuda_without_toolchain() {
        let (_dir, mut config) = project(&["src/a.cc", "kernels/b.cu"]);
        config.cpp_args = strings(&["-std=c++17", "-Iinclude"]);

        let run = generate(&config, &FakeProbe::default()).unwrap();
        assert_eq!(run.entries.len(), 2);

        let a = run.entries.iter().find(|e| e.file == "src/a.cc").unwrap();
        assert_eq!(a.command, "g++ -std=c++17 -Iinclude -c src/a.cc");

        let b = run.entries.iter().find(|e| e.file == "kernels/b.cu").unwrap();
        assert!(b.command.starts_with("nvcc "));
        assert!(b.command.contains("-Iinclude"));
        assert!(!b.command.contains("-std=c++17"));
        assert!(!b.command.contains("--cuda-path"));
        assert!(!b.command.contains("--cuda-gpu-arch"));
        assert!(b.command.contains("-D__CUDACC__"));

        for entry in &run.entries {
            assert_eq!(entry.directory, config.root.display().to_string());
            assert!(config.root.join(&entry.file).is_file());
        }
        assert!(!run.warnings.is_empty());
        assert_eq!(run.output_path, config.root.join(output::OUTPUT_FILE));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let (_dir, mut config) = project(&["b.cc", "a.cc", "k/x.cu", "k/a.cu"]);
        config.cpp_args = strings(&["-O2", "-Iinc"]);

        let first = generate(&config, &FakeProbe::default()).unwrap();
        let before = fs::read(&first.output_path).unwrap();
        let second = generate(&config, &FakeProbe::default()).unwrap();
        assert_eq!(before, fs::read(&second.output_path).unwrap());
    }

    #[test]
    fn test_ignored_files_never_appear() {
        let (_dir, mut config) = project(&["src/a.cc", "build/gen.cc", "third_party/x/y.cu"]);
        config.ignore = strings(&["build/*", "third_party/*"]);

        let run = generate(&config, &FakeProbe::default()).unwrap();
        let files: Vec<&str> = run.entries.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(files, vec!["src/a.cc"]);
    }

    #[test]
    fn test_malformed_ignore_pattern_is_a_warning() {
        let (_dir, mut config) = project(&["a.cc"]);
        config.ignore = strings(&["src/**x"]);

        let run = generate(&config, &FakeProbe::default()).unwrap();
        assert_eq!(run.entries.len(), 1);
        assert!(run.warnings.iter().any(|w| w.contains("src/**x")));
    }

    #[test]
    fn test_header_only_project_uses_placeholder() {
        let (dir, mut config) = project(&["include/lib.h"]);
        config.cuda_args = strings(&["-Xcompiler=-fPIC"]);
        config.cpp_args = strings(&["-Iinclude"]);

        let run = generate(&config, &FakeProbe::default()).unwrap();
        assert!(run.placeholder_used);
        assert_eq!(run.entries.len(), 1);

        let entry = &run.entries[0];
        let file = Path::new(&entry.file);
        assert!(file.is_absolute());
        assert!(file.starts_with(fs::canonicalize(dir.path().join("placeholder")).unwrap()));
        assert!(entry.command.starts_with("nvcc -Xcompiler=-fPIC -Iinclude"));
        assert!(
            run.warnings
                .iter()
                .any(|w| w.contains("No valid source files found"))
        );
    }

    #[test]
    fn test_gpu_without_compiler_keeps_arch_flags() {
        let (_dir, config) = project(&["k.cu"]);
        let probe = FakeProbe::default().with_tool("nvidia-smi", "/usr/bin/nvidia-smi", "8.6\n");

        let run = generate(&config, &probe).unwrap();
        let command = &run.entries[0].command;
        assert!(command.contains("--cuda-gpu-arch=sm_86"));
        assert!(command.contains("-D__CUDA_ARCH__=860"));
        assert!(!command.contains("--cuda-path"));
        assert!(!command.contains("-D__NVCC__"));
        assert!(!run.toolchain.available);
    }

    #[test]
    fn test_failing_compiler_keeps_only_arch_flags() {
        let (_dir, config) = project(&["k.cu"]);
        let probe = FakeProbe::default()
            .with_broken_tool("nvcc", "/opt/cuda/bin/nvcc")
            .with_tool("nvidia-smi", "/usr/bin/nvidia-smi", "9.0\n");

        let run = generate(&config, &probe).unwrap();
        let command = &run.entries[0].command;
        assert!(command.contains("--cuda-gpu-arch=sm_90"));
        assert!(command.contains("-D__CUDA_ARCH__=900"));
        assert!(!command.contains("--cuda-path"));
        assert!(!command.contains("/opt/cuda/include"));
        assert!(!command.contains("-D__NVCC__"));
        assert!(command.contains("-D__CUDACC__"));
        assert!(run.warnings.iter().any(|w| w.starts_with("nvcc --version")));
    }

    #[test]
    fn test_no_inherit_keeps_cuda_clean() {
        let (_dir, mut config) = project(&["k.cu"]);
        config.cpp_args = strings(&["-Iinclude"]);
        config.cuda_inherits_cpp = false;

        let run = generate(&config, &FakeProbe::default()).unwrap();
        assert!(!run.entries[0].command.contains("-Iinclude"));
    }

    #[test]
    fn test_output_dir_override() {
        let (dir, config) = project(&["a.cc"]);
        let out = dir.path().join("out");
        let config = config.with_output_dir(&out);

        let run = generate(&config, &FakeProbe::default()).unwrap();
        assert_eq!(run.output_path, out.join(output::OUTPUT_FILE));
        assert!(!config.root.join(output::OUTPUT_FILE).exists());
        assert_eq!(run.entries[0].directory, config.root.display().to_string());
    }
}
