//! Data models and structures for gdscan

pub mod analysis;
pub mod config;
pub mod record;
pub mod statistics;
pub mod table;

pub use analysis::{AnalysisError, AnalysisResults, AnalysisSummary, DependencyEdge, EdgeKind, EntityReport, FileReport};
pub use config::Settings;
pub use record::{EntityRecord, FileRecord, LanguageType, Record, ReferenceFact, SourceFile};
pub use statistics::{StatKey, Statistics, StatisticsSink, StatisticsSnapshot};
pub use table::ResultTable;
