//! Run configuration

use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};
use crate::types::{DateRange, FieldLayout};

/// File name used when the output destination is a directory.
pub const DEFAULT_OUTPUT_NAME: &str = "parsed_firewall_logs.csv";

/// Options for one scan run
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory holding the daily `.gz` log files
    pub source_dir: PathBuf,
    /// Newline-separated IP list
    pub ip_list: PathBuf,
    /// Only files dated within this range are scanned (None = all)
    pub date_range: Option<DateRange>,
    /// Output CSV file, or a directory to place it in
    pub output: PathBuf,
    /// Size of the worker pool
    pub workers: usize,
    /// Columns to extract
    pub layout: FieldLayout,
    /// Optional JSON run report
    pub report: Option<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            ip_list: PathBuf::from("ips.txt"),
            date_range: None,
            output: PathBuf::from(DEFAULT_OUTPUT_NAME),
            workers: num_cpus::get().max(1),
            layout: FieldLayout::Standard,
            report: None,
        }
    }
}

impl ScanOptions {
    /// Creates options with the three required locations
    pub fn new(source_dir: &Path, ip_list: &Path, output: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            ip_list: ip_list.to_path_buf(),
            output: output.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_layout(mut self, layout: FieldLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_report(mut self, path: &Path) -> Self {
        self.report = Some(path.to_path_buf());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ScanError::InvalidWorkerCount);
        }
        Ok(())
    }
}
