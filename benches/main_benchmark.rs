use ccgen::config::{DEFAULT_CPP_SUFFIXES, DEFAULT_CUDA_SUFFIXES};
use ccgen::flags::{self, FlagSet, Origin};
use ccgen::ignore::{self, IgnoreSet};
use ccgen::scan::{self, Language, SourceFile};
use ccgen::synth;
use ccgen::toolchain::{ComputeCapability, CudaToolchain, CudaVersion};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::path::{Path, PathBuf};

const IGNORE: &[&str] = &["build/*", "third_party/*", "*.pb.cc", "tests/fixtures/**"];

fn bench_project() -> PathBuf {
    let root = std::env::temp_dir().join("ccgen_bench_scan");
    if !root.exists() {
        for module in 0..20 {
            let dir = root.join(format!("src/module_{module}"));
            std::fs::create_dir_all(&dir).unwrap();
            for file in 0..10 {
                std::fs::write(dir.join(format!("unit_{file}.cc")), "").unwrap();
                std::fs::write(dir.join(format!("unit_{file}.h")), "").unwrap();
            }
            std::fs::write(dir.join("kernel.cu"), "").unwrap();
        }
        std::fs::create_dir_all(root.join("build")).unwrap();
        std::fs::write(root.join("build/generated.cc"), "").unwrap();
    }
    root
}

fn full_toolchain() -> CudaToolchain {
    CudaToolchain {
        available: true,
        compiler_path: Some(PathBuf::from("/usr/local/cuda/bin/nvcc")),
        version: Some(CudaVersion {
            major: 12,
            minor: 6,
            build: Some(20),
        }),
        install_path: Some(PathBuf::from("/usr/local/cuda")),
        compute_capability: Some(ComputeCapability { major: 9, minor: 0 }),
        warnings: Vec::new(),
    }
}

fn bench_scan(c: &mut Criterion) {
    let root = bench_project();
    let ignore = IgnoreSet::new(IGNORE);

    c.bench_function("scan_project", |b| {
        b.iter(|| {
            scan::scan(
                black_box(&root),
                DEFAULT_CPP_SUFFIXES,
                DEFAULT_CUDA_SUFFIXES,
                &ignore,
            )
        })
    });
}

fn bench_ignore(c: &mut Criterion) {
    let ignore = IgnoreSet::new(IGNORE);

    c.bench_function("ignore_set_match", |b| {
        b.iter(|| {
            let _ = ignore.is_ignored(black_box("src/module_3/unit_7.cc"));
            let _ = ignore.is_ignored(black_box("third_party/cutlass/include/gemm.cu"));
            let _ = ignore.is_ignored(black_box("proto/api.pb.cc"));
        })
    });

    c.bench_function("single_pattern_match", |b| {
        b.iter(|| ignore::matches(black_box("src/*/kernels/*.cu"), black_box("src/a/kernels/b.cu")))
    });
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_suffix", |b| {
        b.iter(|| {
            let _ = scan::classify(
                black_box("kernel.cu"),
                DEFAULT_CPP_SUFFIXES,
                DEFAULT_CUDA_SUFFIXES,
            );
            let _ = scan::classify(
                black_box("notes.txt"),
                DEFAULT_CPP_SUFFIXES,
                DEFAULT_CUDA_SUFFIXES,
            );
        })
    });
}

fn bench_flags(c: &mut Criterion) {
    let toolchain = full_toolchain();

    c.bench_function("detected_cuda_flags", |b| {
        b.iter(|| flags::detected_cuda_flags(black_box(&toolchain)))
    });

    let user: Vec<String> = (0..50).map(|i| format!("-Iinclude/dir_{i}")).collect();
    c.bench_function("flag_set_dedup_includes", |b| {
        b.iter(|| {
            let mut set = FlagSet::new();
            set.extend(user.iter().cloned(), Origin::User);
            set.extend(user.iter().cloned(), Origin::Inherited);
            set
        })
    });
}

fn bench_synthesize(c: &mut Criterion) {
    let files: Vec<SourceFile> = (0..200)
        .map(|i| SourceFile {
            path: PathBuf::from(format!("src/unit_{i}.cc")),
            language: if i % 10 == 0 {
                Language::Cuda
            } else {
                Language::Cpp
            },
        })
        .collect();
    let mut cpp = FlagSet::new();
    cpp.extend(["-std=c++17", "-Iinclude", "-DNDEBUG"], Origin::User);
    let mut cuda = cpp.clone();
    cuda.extend(flags::detected_cuda_flags(&full_toolchain()), Origin::Detected);

    c.bench_function("synthesize_200_entries", |b| {
        b.iter(|| synth::synthesize(black_box(&files), &cpp, &cuda, Path::new("/work/project")))
    });
}

criterion_group!(
    benches,
    bench_scan,
    bench_ignore,
    bench_classify,
    bench_flags,
    bench_synthesize
);
criterion_main!(benches);
