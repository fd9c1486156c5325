//! Toolchain discovery.
//!
//! Only the CUDA side is probed: the C++ command line is assembled from user
//! flags alone, while CUDA entries pick up the local compiler's install path,
//! version macros and the first GPU's architecture when those can be found.
//! Detection never fails; anything it cannot determine is left unset and
//! reported as a warning.

pub mod cuda;
pub mod probe;
pub mod types;

pub use cuda::detect;
pub use probe::{Probe, ProbeError, SystemProbe};
pub use types::{ComputeCapability, CudaToolchain, CudaVersion};
