use std::path::PathBuf;

/// Failures that stop a generation run before anything is written.
#[derive(Debug)]
pub enum Error {
    /// No project root was given
    MissingRoot,
    /// The project root does not exist or is not a directory
    InvalidRoot(PathBuf),
    /// `--reuse` was requested for a root that was never recorded
    NoHistory(PathBuf),
    /// The history file exists but could not be understood
    CorruptHistory { path: PathBuf, reason: String },
    /// A recorded invocation no longer parses with the current CLI
    InvalidReplay { root: PathBuf, reason: String },
    /// IO error
    IoError(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingRoot => write!(f, "A project root (--root) is required"),
            Error::InvalidRoot(path) => {
                write!(f, "{} is not a valid directory", path.display())
            }
            Error::NoHistory(root) => {
                write!(f, "No history found for project: [{}]", root.display())
            }
            Error::CorruptHistory { path, reason } => {
                write!(f, "History file {} is unreadable: {}", path.display(), reason)
            }
            Error::InvalidReplay { root, reason } => write!(
                f,
                "Recorded command for [{}] can no longer be replayed: {}",
                root.display(),
                reason
            ),
            Error::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}
