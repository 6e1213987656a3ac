//! Error types for bytebank-io.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reader and writer operations
pub type Result<T> = std::result::Result<T, BankIoError>;

/// Errors that can occur while streaming account files.
#[derive(Error, Debug)]
pub enum BankIoError {
    /// The input file is missing or inaccessible
    #[error("cannot open {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrong field count or unparseable numeric field
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    /// Invalid UTF-8 byte sequence
    #[error("Invalid UTF-8 sequence at byte offset {offset}")]
    EncodingError { offset: u64 },

    /// Failed to read or write a stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing command or path argument
    #[error("Missing argument. Usage: bytebank-io <dump|accounts|export|capture|stats> <file>")]
    MissingArgument,

    /// Unrecognized CLI command
    #[error("Unknown command '{0}'. Expected one of: dump, accounts, export, capture, stats")]
    UnknownCommand(String),
}

impl BankIoError {
    /// Builds a `SourceUnavailable` error for a file that failed to open or
    /// create.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BankIoError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Builds a `MalformedRecord` error.
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        BankIoError::MalformedRecord {
            line,
            message: message.into(),
        }
    }
}
