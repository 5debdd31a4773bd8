//! Shared helpers

pub mod path_resolver;
