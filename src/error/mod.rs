//! Error handling for gdscan
//!
//! This module provides the error types, result alias and error context
//! utilities used by the surrounding scanner (discovery, configuration,
//! reporting).

pub mod context;
pub mod types;

pub use context::{IoResultExt, ResultExt};
pub use types::{ErrorSeverity, Result, ScanError};
