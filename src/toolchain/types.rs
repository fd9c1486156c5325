use std::fmt;
use std::path::PathBuf;

/// `nvcc` release, e.g. `12.6` with build `20` for `V12.6.20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CudaVersion {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
}

impl fmt::Display for CudaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, " (build {})", build)?;
        }
        Ok(())
    }
}

/// GPU compute capability (`major.minor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeCapability {
    pub major: u32,
    pub minor: u32,
}

impl ComputeCapability {
    /// Dotted form as reported by `nvidia-smi`, e.g. `9.0`.
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Value of `__CUDA_ARCH__` for this capability, e.g. `900`.
    pub fn arch_macro(&self) -> u32 {
        self.major * 100 + self.minor * 10
    }

    /// Target name accepted by `--cuda-gpu-arch`, e.g. `sm_90`.
    pub fn sm(&self) -> String {
        format!("sm_{}{}", self.major, self.minor)
    }
}

/// What detection found. Each field stands alone: a missing one only
/// suppresses the flags derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CudaToolchain {
    /// A CUDA compiler was found on the search path and answered `--version`
    pub available: bool,
    pub compiler_path: Option<PathBuf>,
    pub version: Option<CudaVersion>,
    pub install_path: Option<PathBuf>,
    pub compute_capability: Option<ComputeCapability>,
    /// Degradations encountered while probing, in probe order
    pub warnings: Vec<String>,
}

impl CudaToolchain {
    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_capability_encodings() {
        let cc = ComputeCapability { major: 9, minor: 0 };
        assert_eq!(cc.dotted(), "9.0");
        assert_eq!(cc.arch_macro(), 900);
        assert_eq!(cc.sm(), "sm_90");

        let cc = ComputeCapability { major: 8, minor: 6 };
        assert_eq!(cc.arch_macro(), 860);
        assert_eq!(cc.sm(), "sm_86");
    }

    #[test]
    fn test_version_display() {
        let v = CudaVersion {
            major: 12,
            minor: 6,
            build: Some(20),
        };
        assert_eq!(v.to_string(), "12.6 (build 20)");
        let v = CudaVersion { build: None, ..v };
        assert_eq!(v.to_string(), "12.6");
    }

    #[test]
    fn test_unavailable_has_no_facts() {
        let tc = CudaToolchain::unavailable();
        assert!(!tc.available);
        assert!(tc.install_path.is_none());
        assert!(tc.compute_capability.is_none());
    }
}
