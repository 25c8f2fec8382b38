//! Error taxonomy for solver runs and baseline bookkeeping.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for harness operations.
pub type BenchResult<T> = Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    /// The solver process could not be started.
    #[error("failed to spawn solver '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The solver process was terminated abnormally (signal or fault).
    #[error("solver terminated abnormally ({status}){}", stderr_suffix(.stderr))]
    Signaled { status: String, stderr: String },

    /// The solver did not exit before its deadline and was killed.
    #[error("solver timed out after {after:?}")]
    Timeout { after: Duration },

    /// Captured output does not have the score/ordering shape.
    #[error("malformed solver output: {reason}")]
    MalformedOutput { reason: String },

    /// A baseline file exists but cannot be trusted as a comparison floor.
    #[error("corrupt baseline {}: {reason}", .path.display())]
    BaselineCorrupt { path: PathBuf, reason: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("test case discovery failed for {}: {message}", .path.display())]
    Discovery { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl BenchError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Launch failure or abnormal termination of the solver.
    pub fn is_process_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::Signaled { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_malformed_output(&self) -> bool {
        matches!(self, Self::MalformedOutput { .. })
    }

    /// Errors that invalidate the harness setup rather than a single test case.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Discovery { .. })
    }

    /// Short stable label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Spawn { .. } | Self::Signaled { .. } => "process_failure",
            Self::Timeout { .. } => "timeout",
            Self::MalformedOutput { .. } => "malformed_output",
            Self::BaselineCorrupt { .. } => "baseline_corrupt",
            Self::Config { .. } => "config",
            Self::Discovery { .. } => "discovery",
            Self::Io { .. } => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signaled_message_includes_trimmed_stderr() {
        let err = BenchError::Signaled {
            status: "signal: 11".into(),
            stderr: "segfault in pivot\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "solver terminated abnormally (signal: 11): segfault in pivot"
        );

        let quiet = BenchError::Signaled {
            status: "signal: 9".into(),
            stderr: "  \n".into(),
        };
        assert_eq!(quiet.to_string(), "solver terminated abnormally (signal: 9)");
    }

    #[test]
    fn kinds_classify_failures() {
        let spawn = BenchError::Spawn {
            program: PathBuf::from("/nope/fas"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(spawn.is_process_failure());
        assert_eq!(spawn.kind(), "process_failure");

        let timeout = BenchError::Timeout {
            after: Duration::from_secs(3),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_process_failure());

        assert!(BenchError::malformed("missing ordering").is_malformed_output());
        assert!(BenchError::config("runs must be >= 1").is_config_error());
    }
}
