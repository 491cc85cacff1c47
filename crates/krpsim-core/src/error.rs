//! Unified error type for the krpsim ecosystem
//!
//! [`KrpsimError`] gives the parser, scheduler, and verifier a single
//! vocabulary of failure kinds. A planner running out of budget or a
//! scheduler reaching deadlock are deliberately absent: both are normal
//! control flow, not errors.

use thiserror::Error;

/// One variant per fatal error kind. Each carries the offending line,
/// cycle, or resource name needed to produce a useful diagnostic.
#[derive(Error, Debug)]
pub enum KrpsimError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is structurally invalid or names no recognized
    /// optimization target.
    #[error("bad configuration file at line {line}: {reason}")]
    BadFile { line: usize, reason: String },

    /// Configuration declares no processes.
    #[error("configuration has no processes")]
    NoProcesses,

    /// Trace file is empty or contains only blank lines before the end
    /// sentinel.
    #[error("trace is empty")]
    EmptyTrace,

    /// A trace line has no colon separator or otherwise cannot be split
    /// into a cycle and a process name.
    #[error("malformed trace line {line}: {content:?}")]
    MalformedTraceLine { line: usize, content: String },

    /// The cycle field of a trace line is not a base-10 integer.
    #[error("bad cycle number on line {line}: {content:?}")]
    BadCycleNumber { line: usize, content: String },

    /// The cycle field of a trace line is negative.
    #[error("negative cycle {cycle} on line {line}")]
    NegativeCycle { line: usize, cycle: i64 },

    /// A trace line's cycle is smaller than the previous line's cycle.
    #[error("cycles out of order on line {line}: {cycle} < {previous}")]
    CyclesOutOfOrder {
        line: usize,
        cycle: i64,
        previous: i64,
    },

    /// A trace line names a process absent from the catalog.
    #[error("unknown process {process:?} on line {line}")]
    UnknownProcess { line: usize, process: String },

    /// Replaying a process at a trace line would drive some resource
    /// below zero.
    #[error(
        "unsatisfied needs for {process:?} on line {line}: needs {needed:?}, have {available:?}"
    )]
    UnsatisfiedNeeds {
        line: usize,
        process: String,
        needed: String,
        available: String,
    },

    /// Generic errors (for wrapping external errors at a crate boundary).
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using KrpsimError.
pub type KrpsimResult<T> = Result<T, KrpsimError>;

impl From<anyhow::Error> for KrpsimError {
    fn from(err: anyhow::Error) -> Self {
        KrpsimError::Other(err.to_string())
    }
}

impl From<String> for KrpsimError {
    fn from(s: String) -> Self {
        KrpsimError::Other(s)
    }
}

impl From<&str> for KrpsimError {
    fn from(s: &str) -> Self {
        KrpsimError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_file_reports_line_and_reason() {
        let err = KrpsimError::BadFile {
            line: 7,
            reason: "missing colon".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("missing colon"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KrpsimError = io_err.into();
        assert!(matches!(err, KrpsimError::Io(_)));
    }

    #[test]
    fn result_type_alias() {
        fn example() -> KrpsimResult<i32> {
            Ok(42)
        }
        assert_eq!(example().unwrap(), 42);
    }

    #[test]
    fn question_mark_propagates() {
        fn inner() -> KrpsimResult<()> {
            Err(KrpsimError::NoProcesses)
        }
        fn outer() -> KrpsimResult<()> {
            inner()?;
            Ok(())
        }
        assert!(outer().is_err());
    }

    #[test]
    fn anyhow_conversion_preserves_message() {
        let err: KrpsimError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
