use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that terminate a run.
///
/// Everything here is raised either before the first log file is opened
/// (configuration) or after the last worker has finished (output).
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot read IP list {path}: {source}")]
    IpList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot list log directory {path}: {source}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("Cannot create output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot write run report {path}: {message}")]
    Report { path: PathBuf, message: String },

    #[error("Invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid IP matcher: {0}")]
    Matcher(#[from] aho_corasick::BuildError),

    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors confined to a single log file.
///
/// These never abort a run: the worker keeps whatever it extracted
/// before the failure and the coordinator records the file as skipped.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("open failed: {0}")]
    Open(#[source] io::Error),

    #[error("read failed after line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;
