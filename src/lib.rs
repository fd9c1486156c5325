//! # ccgen - compile_commands.json for C/C++/CUDA projects
//!
//! ccgen walks a project tree, classifies sources as C/C++ or CUDA, probes
//! the local CUDA toolchain and writes a compile database clangd can index
//! without a real build system.
//!
//! ## Features
//!
//! - **Zero Build Required**: Synthesizes one `g++`/`nvcc` command per source
//! - **CUDA Aware**: Adds arch, version and nvcc-emulation defines from `nvcc` and `nvidia-smi`
//! - **Include Sharing**: C++ `-I` directories follow into CUDA commands
//! - **Torch & CUTLASS**: Optional include discovery for both
//! - **Header-only Projects**: A placeholder unit keeps clangd working
//! - **History**: Re-run the last command for a project with `--reuse`
//!
//! ## Quick Start
//!
//! ```bash
//! compile_commands -r . --cpp-args=-std=c++17,-Iinclude
//! compile_commands -r . --reuse
//! ```
//!
//! ## Module Organization
//!
//! - [`scan`] - Source discovery and classification
//! - [`toolchain`] - CUDA compiler and GPU detection
//! - [`flags`] - Per-language flag reconciliation
//! - [`pipeline`] - One end-to-end generation run
//! - [`history`] - Per-project command history
//! - [`commands`] - CLI command handlers

/// Command-line definition (clap).
pub mod cli;

/// CLI command handlers extracted from main.
pub mod commands;

/// Run configuration and user settings (`config.toml`).
pub mod config;

/// Error types.
pub mod error;

/// Flag sets for C++ and CUDA, including Torch and CUTLASS includes.
pub mod flags;

/// Per-project command history for `--reuse`.
pub mod history;

/// Ignore-glob matching.
pub mod ignore;

/// Writing `compile_commands.json`.
pub mod output;

/// End-to-end generation.
pub mod pipeline;

/// Placeholder unit for projects without sources.
pub mod placeholder;

/// Project tree scanning.
pub mod scan;

/// Compile command synthesis.
pub mod synth;

/// CUDA toolchain detection.
pub mod toolchain;

/// Terminal UI helpers.
pub mod ui;

pub use error::Error;
