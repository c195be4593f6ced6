pub mod config;
pub mod coordinator;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod pipeline;
pub mod selector;
pub mod sink;
pub mod types;
pub mod worker;

pub use config::ScanOptions;
pub use coordinator::{FileFailure, ScanCoordinator, ScanProgress, ScanReport};
pub use error::{FileError, Result, ScanError};
pub use extract::FieldExtractor;
pub use matcher::IpMatcher;
pub use pipeline::{RunSummary, run_scan};
pub use types::{DateRange, ExtractedRecord, FieldLayout, IpSet, LogFileDescriptor};
