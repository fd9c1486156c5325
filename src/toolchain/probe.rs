//! External process probing.
//!
//! Detection talks to the outside world only through [`Probe`], so the
//! parsing logic can be exercised against canned tool output.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const MAX_OUTPUT_BYTES: u64 = 64 * 1024;

pub trait Probe {
    /// Resolve an executable on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run `program` and return its stdout.
    fn run(&self, program: &Path, args: &[&str]) -> Result<String, ProbeError>;
}

#[derive(Debug)]
pub enum ProbeError {
    /// The process could not be started or waited on
    Spawn(io::Error),
    /// The process exited unsuccessfully
    Failed(ExitStatus),
    /// The process was killed after exceeding the probe timeout
    TimedOut(Duration),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Spawn(e) => write!(f, "failed to run: {}", e),
            ProbeError::Failed(status) => write!(f, "exited with {}", status),
            ProbeError::TimedOut(after) => write!(f, "timed out after {:.1?}", after),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Probes the real system: `which`-style lookup and bounded child processes.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    timeout: Duration,
}

impl SystemProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Probe for SystemProbe {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, program: &Path, args: &[&str]) -> Result<String, ProbeError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(ProbeError::Spawn)?;

        // Drained concurrently; the child stalls once the pipe is full.
        let stdout = child.stdout.take();
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout {
                let _ = out.by_ref().take(MAX_OUTPUT_BYTES).read_to_end(&mut buf);
                let _ = io::copy(&mut out, &mut io::sink());
            }
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ProbeError::TimedOut(self.timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(ProbeError::Spawn(e));
                }
            }
        };

        let output = reader.join().unwrap_or_default();
        if !status.success() {
            return Err(ProbeError::Failed(status));
        }
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;

    /// In-memory probe keyed by program name.
    #[derive(Default)]
    pub struct FakeProbe {
        installed: HashMap<String, PathBuf>,
        outputs: HashMap<String, Option<String>>,
    }

    impl FakeProbe {
        /// Make `program` resolvable at `path`, answering every run with `stdout`.
        pub fn with_tool(mut self, program: &str, path: &str, stdout: &str) -> Self {
            self.installed.insert(program.to_string(), PathBuf::from(path));
            self.outputs
                .insert(program.to_string(), Some(stdout.to_string()));
            self
        }

        /// Make `program` resolvable but failing whenever it runs.
        pub fn with_broken_tool(mut self, program: &str, path: &str) -> Self {
            self.installed.insert(program.to_string(), PathBuf::from(path));
            self.outputs.insert(program.to_string(), None);
            self
        }
    }

    impl Probe for FakeProbe {
        fn locate(&self, program: &str) -> Option<PathBuf> {
            self.installed.get(program).cloned()
        }

        fn run(&self, program: &Path, _args: &[&str]) -> Result<String, ProbeError> {
            let name = self
                .installed
                .iter()
                .find(|(_, path)| path.as_path() == program)
                .map(|(name, _)| name.clone())
                .unwrap_or_default();
            match self.outputs.get(&name) {
                Some(Some(out)) => Ok(out.clone()),
                Some(None) => Err(ProbeError::Spawn(io::Error::other("tool crashed"))),
                None => Err(ProbeError::Spawn(io::Error::from(io::ErrorKind::NotFound))),
            }
        }
    }
}
