//! Core functionality for project discovery and the two-phase analysis

pub mod analyzer;
pub mod curator;
pub mod linker;
pub mod walker;

pub use analyzer::{AnalysisRun, Analyzer};
pub use curator::DependencyCurator;
pub use linker::link_siblings;
pub use walker::Walker;
