//! Log file discovery.
//!
//! Daily files are named `<prefix>.DD.MM.YY.gz`, e.g.
//! `Firewall_Rules.24.03.25.gz`. Anything else in the directory is
//! ignored.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, trace, warn};

use crate::error::{Result, ScanError};
use crate::types::{DateRange, LogFileDescriptor};

const LOG_SUFFIX: &str = ".gz";
const CENTURY: i32 = 2000;

/// Outcome of a directory listing.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Candidates in `(date, path)` order.
    pub files: Vec<LogFileDescriptor>,
    /// Entries whose name did not carry a valid date.
    pub unmatched: usize,
    /// Dated files that fell outside the range.
    pub out_of_range: usize,
}

/// Extracts the `DD.MM.YY` date from a log file name.
///
/// Returns `None` when the name does not follow the pattern or encodes
/// an impossible calendar date.
pub fn parse_file_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(LOG_SUFFIX)?;

    let mut parts = stem.rsplitn(4, '.');
    let year = two_digits(parts.next()?)?;
    let month = two_digits(parts.next()?)?;
    let day = two_digits(parts.next()?)?;
    // A prefix (possibly empty) must precede the leading dot.
    parts.next()?;

    NaiveDate::from_ymd_opt(CENTURY + year as i32, month, day)
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Lists `dir` (non-recursively) and keeps the dated log files within
/// `range`. With no range every dated file is kept.
pub fn select_files(dir: &Path, range: Option<&DateRange>) -> Result<Selection> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::SourceDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut selection = Selection::default();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(date) = entry.file_name().to_str().and_then(parse_file_date) else {
            trace!("Ignoring {}: name carries no log date", path.display());
            selection.unmatched += 1;
            continue;
        };

        if range.is_some_and(|r| !r.contains(date)) {
            trace!("Ignoring {}: {} outside range", path.display(), date);
            selection.out_of_range += 1;
            continue;
        }

        selection.files.push(LogFileDescriptor::new(path, date));
    }

    selection.files.sort();

    debug!(
        "Selected {} log files from {} ({} unmatched, {} out of range)",
        selection.files.len(),
        dir.display(),
        selection.unmatched,
        selection.out_of_range
    );

    Ok(selection)
}
