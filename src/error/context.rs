//! Error context helpers

use std::io;
use std::path::Path;

use crate::error::{Result, ScanError};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| ScanError::Analysis {
            message: format!("{}: {}", context(), err),
        })
    }
}

/// Attach the path of a source file to an I/O failure
pub trait IoResultExt<T> {
    /// Permission problems become [`ScanError::PermissionDenied`], anything
    /// else [`ScanError::SourceRead`]
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| match err.kind() {
            io::ErrorKind::PermissionDenied => ScanError::permission_denied(path.as_ref()),
            _ => ScanError::source_read_error(path.as_ref(), err),
        })
    }
}
