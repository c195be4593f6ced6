//! Scan coordinator
//!
//! Fans file scans out over a bounded worker pool and merges the
//! per-file results into one result set. Workers never share output:
//! each one hands its records back over a channel, and only the
//! coordinating thread touches the merged collection.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossbeam_channel::bounded;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ScanError};
use crate::extract::FieldExtractor;
use crate::matcher::IpMatcher;
use crate::types::{ExtractedRecord, FieldLayout, IpSet, LogFileDescriptor};
use crate::worker::{FileOutcome, scan_file};

/// Snapshot handed to the progress callback after each finished file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanProgress {
    pub files_done: usize,
    pub files_total: usize,
    pub records_found: usize,
    pub files_failed: usize,
}

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(&ScanProgress) + Send + Sync>;

/// A file that could not be read to the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub reason: String,
    /// Rows extracted before the failure; they are kept in the output.
    pub records_kept: usize,
}

/// Merged result of one scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Records of every file, grouped by file in candidate order.
    pub records: Vec<ExtractedRecord>,
    pub files_scanned: usize,
    pub failures: Vec<FileFailure>,
    pub lines_read: u64,
    pub duration: Duration,
}

impl ScanReport {
    fn absorb(&mut self, outcome: FileOutcome) {
        self.files_scanned += 1;
        self.lines_read += outcome.lines_read;

        if let Some(err) = &outcome.error {
            self.failures.push(FileFailure {
                path: outcome.descriptor.path.clone(),
                date: outcome.descriptor.date,
                reason: err.to_string(),
                records_kept: outcome.records.len(),
            });
        }

        self.records.extend(outcome.records);
    }

}

/// Dispatches one worker per file, at most `workers` at a time.
pub struct ScanCoordinator {
    workers: usize,
    matcher: Arc<IpMatcher>,
    extractor: Arc<FieldExtractor>,
}

impl ScanCoordinator {
    /// Compiles the IP matcher and field table once for the whole run.
    pub fn new(ips: &IpSet, layout: FieldLayout, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(ScanError::InvalidWorkerCount);
        }

        Ok(Self {
            workers,
            matcher: Arc::new(IpMatcher::new(ips)?),
            extractor: Arc::new(FieldExtractor::new(layout)?),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn layout(&self) -> FieldLayout {
        self.extractor.layout()
    }

    /// Scans every descriptor and returns once all of them are done.
    ///
    /// A file failure is recorded in the report and never stops the
    /// other files. Records come out in descriptor order whatever the
    /// completion order, so a fixed input always yields the same rows.
    pub fn run(
        &self,
        files: &[LogFileDescriptor],
        progress: Option<ProgressCallback>,
    ) -> Result<ScanReport> {
        let start_time = Instant::now();
        let total = files.len();

        info!(
            "Scanning {} files with {} workers ({} addresses)",
            total,
            self.workers,
            self.matcher.pattern_count()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("fwsift-worker-{}", i))
            .build()?;

        let (result_tx, result_rx) = bounded::<(usize, FileOutcome)>(self.workers * 2);

        for (index, descriptor) in files.iter().enumerate() {
            let tx = result_tx.clone();
            let descriptor = descriptor.clone();
            let matcher = Arc::clone(&self.matcher);
            let extractor = Arc::clone(&self.extractor);

            pool.spawn(move || {
                let outcome = scan_file(&descriptor, &matcher, &extractor);
                let _ = tx.send((index, outcome));
            });
        }

        // Only the spawned tasks hold senders now; recv fails once all are gone.
        drop(result_tx);

        let mut slots: Vec<Option<FileOutcome>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        let mut state = ScanProgress {
            files_total: total,
            ..Default::default()
        };

        while let Ok((index, outcome)) = result_rx.recv() {
            state.files_done += 1;
            state.records_found += outcome.records.len();
            if !outcome.is_ok() {
                state.files_failed += 1;
            }

            if let Some(ref callback) = progress {
                callback(&state);
            }

            slots[index] = Some(outcome);
        }

        // Every task sends exactly once: a panicking worker aborts the
        // process since the pool has no panic handler.
        let mut report = ScanReport::default();
        for outcome in slots.into_iter().flatten() {
            report.absorb(outcome);
        }

        report.duration = start_time.elapsed();

        debug!(
            "Merged {} records from {} files ({} lines read)",
            report.records.len(),
            report.files_scanned,
            report.lines_read
        );
        info!(
            "Scan complete: {} records, {} files skipped, {:.2}s",
            report.records.len(),
            report.failures.len(),
            report.duration.as_secs_f64()
        );

        Ok(report)
    }
}
