//! Per-file scan: gunzip, filter by IP, extract.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use flate2::read::MultiGzDecoder;
use tracing::{debug, warn};

use crate::error::FileError;
use crate::extract::{FieldExtractor, date_column};
use crate::matcher::IpMatcher;
use crate::types::{ExtractedRecord, LogFileDescriptor};

const READ_BUFFER_SIZE: usize = 256 * 1024;

/// What one worker produced for one file.
///
/// `error` being set does not invalidate `records`: they are the rows
/// extracted before the failure.
#[derive(Debug)]
pub struct FileOutcome {
    pub descriptor: LogFileDescriptor,
    pub records: Vec<ExtractedRecord>,
    pub lines_read: u64,
    pub error: Option<FileError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Scans one gzip-compressed log file in a single streaming pass.
pub fn scan_file(
    descriptor: &LogFileDescriptor,
    matcher: &IpMatcher,
    extractor: &FieldExtractor,
) -> FileOutcome {
    let file = match File::open(&descriptor.path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Cannot open {}: {}", descriptor.path.display(), e);
            return FileOutcome {
                descriptor: descriptor.clone(),
                records: Vec::new(),
                lines_read: 0,
                error: Some(FileError::Open(e)),
            };
        }
    };

    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, MultiGzDecoder::new(file));
    let outcome = scan_lines(reader, descriptor, matcher, extractor);

    match &outcome.error {
        Some(e) => warn!(
            "{}: {} (keeping {} records)",
            descriptor.path.display(),
            e,
            outcome.records.len()
        ),
        None => debug!(
            "{}: {} lines, {} matched",
            descriptor.path.display(),
            outcome.lines_read,
            outcome.records.len()
        ),
    }

    outcome
}

/// Filters and extracts from an already-decoded line stream.
///
/// Bytes are matched before decoding; only matching lines are decoded,
/// lossily, so invalid UTF-8 never stops the read.
pub fn scan_lines<R: BufRead>(
    mut reader: R,
    descriptor: &LogFileDescriptor,
    matcher: &IpMatcher,
    extractor: &FieldExtractor,
) -> FileOutcome {
    let date = date_column(descriptor.date);
    let mut records = Vec::new();
    let mut lines_read = 0u64;
    let mut buf = Vec::with_capacity(1024);
    let mut error = None;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                lines_read += 1;
                let line = trim_line_end(&buf);
                if matcher.is_match(line) {
                    let text = String::from_utf8_lossy(line);
                    records.push(extractor.extract(&text, &date));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error = Some(FileError::Read {
                    line: lines_read,
                    source: e,
                });
                break;
            }
        }
    }

    FileOutcome {
        descriptor: descriptor.clone(),
        records,
        lines_read,
        error,
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
