//! End-to-end run: select, scan, merge, write.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ScanOptions;
use crate::coordinator::{FileFailure, ProgressCallback, ScanCoordinator};
use crate::error::{Result, ScanError};
use crate::selector::select_files;
use crate::sink::ResultSink;
use crate::types::{DateRange, FieldLayout, IpSet};

/// What a finished run did, suitable for the console summary and the
/// JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source_dir: PathBuf,
    pub output: PathBuf,
    pub layout: FieldLayout,
    pub date_range: Option<DateRange>,
    pub addresses: usize,
    pub workers: usize,
    pub files_selected: usize,
    pub files_unmatched: usize,
    pub files_out_of_range: usize,
    pub files_scanned: usize,
    pub failures: Vec<FileFailure>,
    pub lines_read: u64,
    pub rows_written: usize,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn files_skipped(&self) -> usize {
        self.failures.len()
    }
}

/// Runs one batch scan.
///
/// Configuration problems (IP list, log directory, output location)
/// fail before any log file is opened. Unreadable log files are only
/// reported in the summary.
pub fn run_scan(options: &ScanOptions, progress: Option<ProgressCallback>) -> Result<RunSummary> {
    options.validate()?;

    let ips = IpSet::load(&options.ip_list)?;
    if ips.is_empty() {
        warn!("{} lists no addresses; no line will match", options.ip_list.display());
    } else {
        info!("Loaded {} IPs from {}", ips.len(), options.ip_list.display());
    }

    let selection = select_files(&options.source_dir, options.date_range.as_ref())?;
    let sink = ResultSink::create(&options.output)?;
    let coordinator = ScanCoordinator::new(&ips, options.layout, options.workers)?;

    let report = coordinator.run(&selection.files, progress)?;
    let output = sink.path().to_path_buf();
    let rows_written = sink.write_all(options.layout, &report.records)?;

    let summary = RunSummary {
        source_dir: options.source_dir.clone(),
        output,
        layout: options.layout,
        date_range: options.date_range,
        addresses: ips.len(),
        workers: coordinator.workers(),
        files_selected: selection.files.len(),
        files_unmatched: selection.unmatched,
        files_out_of_range: selection.out_of_range,
        files_scanned: report.files_scanned,
        failures: report.failures,
        lines_read: report.lines_read,
        rows_written,
        elapsed_secs: report.duration.as_secs_f64(),
    };

    if let Some(path) = &options.report {
        write_report(path, &summary)?;
    }

    Ok(summary)
}

fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let report_err = |message: String| ScanError::Report {
        path: path.to_path_buf(),
        message,
    };

    let file = File::create(path).map_err(|e| report_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary).map_err(|e| report_err(e.to_string()))?;
    writer.flush().map_err(|e| report_err(e.to_string()))?;

    info!("Run report written to {}", path.display());
    Ok(())
}
