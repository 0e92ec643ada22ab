//! Global error handling for dirdoc
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

/// Global error type for dirdoc operations
#[derive(Error, Debug)]
pub enum DirDocError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Settings document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DOCX packaging errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for dirdoc operations
pub type Result<T> = std::result::Result<T, DirDocError>;

/// Creates a DirDocError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DirDocError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Wrap the error as a configuration error prefixed with `f()`
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            DirDocError::Config(format!("{}: {}", context, e))
        })
    }
}

impl From<DirDocError> for io::Error {
    fn from(err: DirDocError) -> Self {
        match err {
            DirDocError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
