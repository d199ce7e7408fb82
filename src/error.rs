//! Centralized error types for the gpu-grep pipeline.
//!
//! Every failure mode has a defined outcome:
//!
//! | Error             | Outcome                                     |
//! |-------------------|---------------------------------------------|
//! | DeviceNotFound    | Fatal: no compute device, exit 2            |
//! | KernelCompilation | Fatal: kernel source failed to build, exit 2|
//! | PipelineCreation  | Fatal: pipeline state failed, exit 2        |
//! | InputTooLarge     | Fatal: haystack exceeds offset range, exit 2|
//! | SourceRead        | Binary treats as empty input, "0 matches"   |
//!
//! Capacity overflow is deliberately NOT an error: discovery continues, the
//! excess is dropped from the retained set, and the reporter emits a warning.

use std::fmt;
use std::path::PathBuf;

/// Central error type for all gpu-grep operations.
#[derive(Debug)]
pub enum GrepError {
    /// No compute device available (e.g. no Metal GPU).
    DeviceNotFound,

    /// Kernel source failed to compile, or the kernel function was missing.
    KernelCompilation(String),

    /// Compute pipeline state creation failed.
    PipelineCreation(String),

    /// Haystack is too large for 32-bit match offsets.
    InputTooLarge {
        len: usize,
    },

    /// Failed to read the haystack source.
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for GrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrepError::DeviceNotFound => {
                write!(f, "no compute device available")
            }
            GrepError::KernelCompilation(msg) => {
                write!(f, "kernel compilation failed: {}", msg)
            }
            GrepError::PipelineCreation(msg) => {
                write!(f, "compute pipeline creation failed: {}", msg)
            }
            GrepError::InputTooLarge { len } => {
                write!(
                    f,
                    "input is {} bytes; match offsets are 32-bit, max input is {} bytes",
                    len,
                    u32::MAX
                )
            }
            GrepError::SourceRead { path, source } => {
                write!(f, "cannot read {:?}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for GrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrepError::SourceRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Type alias for Results using GrepError.
pub type Result<T> = std::result::Result<T, GrepError>;

impl GrepError {
    /// Whether this error aborts the run (no recovery, no retry).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GrepError::SourceRead { .. })
    }

    /// Process exit code for this error.
    ///
    /// Usage errors exit 1 (handled at the CLI layer before any of these
    /// exist); fatal backend and setup errors exit 2.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        let errors: Vec<GrepError> = vec![
            GrepError::DeviceNotFound,
            GrepError::KernelCompilation("missing function".into()),
            GrepError::PipelineCreation("bad pipeline descriptor".into()),
            GrepError::InputTooLarge { len: usize::MAX },
            GrepError::SourceRead {
                path: PathBuf::from("/tmp/haystack.txt"),
                source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            },
        ];

        for err in &errors {
            let msg = format!("{}", err);
            assert!(!msg.is_empty(), "Display for {:?} should not be empty", err);
            match err {
                GrepError::DeviceNotFound => {
                    assert!(msg.contains("device"), "DeviceNotFound: {}", msg);
                }
                GrepError::KernelCompilation(_) => {
                    assert!(msg.contains("missing function"), "KernelCompilation: {}", msg);
                }
                GrepError::PipelineCreation(_) => {
                    assert!(msg.contains("bad pipeline descriptor"), "PipelineCreation: {}", msg);
                }
                GrepError::InputTooLarge { .. } => {
                    assert!(msg.contains("32-bit"), "InputTooLarge: {}", msg);
                }
                GrepError::SourceRead { .. } => {
                    assert!(msg.contains("haystack.txt"), "SourceRead: {}", msg);
                    assert!(msg.contains("file not found"), "SourceRead: {}", msg);
                }
            }
        }
    }

    #[test]
    fn test_fatality() {
        assert!(GrepError::DeviceNotFound.is_fatal());
        assert!(GrepError::KernelCompilation("x".into()).is_fatal());
        assert!(GrepError::PipelineCreation("x".into()).is_fatal());
        assert!(GrepError::InputTooLarge { len: 0 }.is_fatal());

        // Unreadable source is downgraded to "empty input" by the binary.
        let read_err = GrepError::SourceRead {
            path: PathBuf::from("/tmp/x"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(!read_err.is_fatal());
    }

    #[test]
    fn test_exit_codes_nonzero() {
        assert_ne!(GrepError::DeviceNotFound.exit_code(), 0);
        assert_ne!(GrepError::KernelCompilation("x".into()).exit_code(), 0);
        // Exit code 1 is reserved for CLI usage errors.
        assert_ne!(GrepError::PipelineCreation("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_source_chain() {
        let err = GrepError::SourceRead {
            path: PathBuf::from("/tmp/x"),
            source: io::Error::new(io::ErrorKind::NotFound, "test source"),
        };
        assert!(
            std::error::Error::source(&err).is_some(),
            "SourceRead should expose its io::Error source"
        );
        assert!(std::error::Error::source(&GrepError::DeviceNotFound).is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        assert_send::<GrepError>();
    }
}
