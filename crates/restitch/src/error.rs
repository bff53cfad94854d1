//! Error types for snapshot rewrite operations.
//!
//! This module provides the structured error type for all operations in the
//! `restitch` crate, covering file access, line anchoring, declaration
//! matching, and text decoding.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::encoding::Encoding;

/// Errors from snapshot rewrite operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RewriteError {
    /// The target file is smaller than the minimum plausible source size.
    ///
    /// Guards against patching a truncated or non-source file.
    #[error("file {path} is too small to be a source file ({size} bytes, minimum {min})")]
    SourceTooSmall {
        /// The file that failed the size guard.
        path: Utf8PathBuf,
        /// Observed size in bytes.
        size: u64,
        /// Configured minimum size in bytes.
        min: u64,
    },

    /// Reading or writing the target file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The requested line number exceeds the file's line count.
    #[error("line {line} is out of range: file has {total} lines")]
    LineOutOfRange {
        /// The 1-based line number that was requested.
        line: u32,
        /// Number of lines actually present.
        total: u32,
    },

    /// No expected-literal declaration was found at or before the line.
    ///
    /// Signals either a wrong line number or an unsupported declaration
    /// style.
    #[error("no expected-literal declaration found at or before line {line}")]
    PatternNotFound {
        /// The 1-based line number the search was anchored to.
        line: u32,
    },

    /// The file's bytes are malformed for the detected encoding.
    #[error("failed to decode {encoding} content: {message}")]
    Decode {
        /// The encoding selected by preamble detection.
        encoding: Encoding,
        /// Description of the malformed input.
        message: String,
    },
}

impl RewriteError {
    /// Creates a size-guard error.
    #[must_use]
    pub const fn source_too_small(path: Utf8PathBuf, size: u64, min: u64) -> Self {
        Self::SourceTooSmall { path, size, min }
    }

    /// Creates a file-access error.
    #[must_use]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a line-out-of-range error.
    #[must_use]
    pub const fn line_out_of_range(line: u32, total: u32) -> Self {
        Self::LineOutOfRange { line, total }
    }

    /// Creates a pattern-not-found error.
    #[must_use]
    pub const fn pattern_not_found(line: u32) -> Self {
        Self::PatternNotFound { line }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(encoding: Encoding, message: impl Into<String>) -> Self {
        Self::Decode {
            encoding,
            message: message.into(),
        }
    }
}
