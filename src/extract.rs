//! Field extraction from `key=value` firewall log lines.
//!
//! The matcher table is compiled once per run and shared read-only by
//! every worker.

use chrono::NaiveDate;
use regex::Regex;

use crate::error::Result;
use crate::types::{DATE_FIELD, ExtractedRecord, FieldLayout};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Precompiled `(field -> matcher)` table for one layout.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    layout: FieldLayout,
    // `None` marks the date column, which never comes from the line.
    matchers: Vec<Option<Regex>>,
}

impl FieldExtractor {
    pub fn new(layout: FieldLayout) -> Result<Self> {
        let matchers = layout
            .fields()
            .iter()
            .map(|field| {
                if *field == DATE_FIELD {
                    Ok(None)
                } else {
                    field_matcher(field).map(Some)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { layout, matchers })
    }

    pub fn layout(&self) -> FieldLayout {
        self.layout
    }

    /// Builds a record for `line`, filling the date column with `file_date`
    /// as produced by [`date_column`].
    ///
    /// Every field is looked up independently; a missing key yields an
    /// empty string for that column only.
    pub fn extract(&self, line: &str, file_date: &str) -> ExtractedRecord {
        let values = self
            .matchers
            .iter()
            .map(|matcher| match matcher {
                None => file_date.to_string(),
                Some(re) => re
                    .captures(line)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        ExtractedRecord::from_values(self.layout, values)
    }
}

/// Date column value for a file dated `date`.
pub fn date_column(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `name=value` or `name="value"`, anchored at a token boundary so that
/// `src_ip` does not match inside `tran_src_ip`. Empty values never match,
/// so a later non-empty occurrence of the same key is used instead.
fn field_matcher(field: &str) -> Result<Regex> {
    let pattern = format!(r#"(?:^|\s){}="?([^"\s]+)"#, regex::escape(field));
    Ok(Regex::new(&pattern)?)
}
