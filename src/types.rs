use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Result, ScanError};

pub const STANDARD_FIELDS: [&str; 13] = [
    "date",
    "time",
    "log_type",
    "status",
    "fw_rule_id",
    "fw_rule_name",
    "src_ip",
    "dst_ip",
    "protocol",
    "dst_country_code",
    "src_port",
    "dst_port",
    "tran_src_ip",
];

pub const SUBTYPE_FIELDS: [&str; 14] = [
    "date",
    "time",
    "log_type",
    "log_subtype",
    "status",
    "fw_rule_id",
    "fw_rule_name",
    "src_ip",
    "dst_ip",
    "protocol",
    "dst_country_code",
    "src_port",
    "dst_port",
    "tran_src_ip",
];

/// Name of the field filled from the file date instead of the line.
pub const DATE_FIELD: &str = "date";

/// Column layout shared by every record and the output header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLayout {
    #[default]
    Standard,
    WithSubtype,
}

impl FieldLayout {
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FieldLayout::Standard => &STANDARD_FIELDS,
            FieldLayout::WithSubtype => &SUBTYPE_FIELDS,
        }
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields().iter().position(|f| *f == field)
    }
}

impl fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLayout::Standard => write!(f, "standard"),
            FieldLayout::WithSubtype => write!(f, "with-subtype"),
        }
    }
}

/// Literal IP addresses used as the line filter.
///
/// No CIDR expansion and no normalization: `10.0.0.5` and `010.0.0.5`
/// are different entries. Ordered so that anything built from it is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpSet {
    ips: BTreeSet<String>,
}

impl IpSet {
    /// Loads a newline-separated list. Lines are trimmed, blanks skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ScanError::IpList {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_lines(&text))
    }

    pub fn from_lines(text: &str) -> Self {
        text.lines().collect()
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.ips.contains(ip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ips.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IpSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let ips = iter
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { ips }
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ScanError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// A candidate log file and the date encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogFileDescriptor {
    pub date: NaiveDate,
    pub path: PathBuf,
}

impl LogFileDescriptor {
    pub fn new(path: PathBuf, date: NaiveDate) -> Self {
        Self { date, path }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// One output row: a value for every field of the layout, in order.
///
/// Absent fields hold an empty string, so all records of a layout have
/// the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedRecord {
    layout: FieldLayout,
    values: Vec<String>,
}

impl ExtractedRecord {
    pub(crate) fn from_values(layout: FieldLayout, values: Vec<String>) -> Self {
        debug_assert_eq!(values.len(), layout.len());
        Self { layout, values }
    }

    pub fn layout(&self) -> FieldLayout {
        self.layout
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.layout.fields()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of `field`, or `None` if the layout has no such column.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.layout
            .position(field)
            .map(|idx| self.values[idx].as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields()
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }
}
