//! Error types for the AML engine
//!
//! Rule evaluation itself is total and never fails. Errors only arise while
//! loading configuration or parsing catalog identifiers supplied by callers.

use thiserror::Error;

/// AML engine error
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Threshold value outside its permitted range
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Trigger code string not present in the catalog
    #[error("Unknown trigger code: {0}")]
    UnknownTriggerCode(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
