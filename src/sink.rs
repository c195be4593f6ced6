//! CSV output table
//!
//! The table is opened before scanning (so an unwritable destination is
//! caught early) and written exactly once, after every worker has
//! finished.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{Terminator, Writer, WriterBuilder};
use tracing::info;

use crate::config::DEFAULT_OUTPUT_NAME;
use crate::error::{Result, ScanError};
use crate::types::{ExtractedRecord, FieldLayout};

/// Maps the requested destination to the table file.
///
/// An existing directory receives `parsed_firewall_logs.csv`; any other
/// path is used as the file itself.
pub fn resolve_output_path(output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(DEFAULT_OUTPUT_NAME)
    } else {
        output.to_path_buf()
    }
}

/// Single writer for the output table.
pub struct ResultSink {
    path: PathBuf,
    writer: Writer<File>,
}

impl ResultSink {
    /// Creates (or truncates) the output file, making parent directories.
    pub fn create(output: &Path) -> Result<Self> {
        let path = resolve_output_path(output);
        let output_err = |source: io::Error| ScanError::Output {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(output_err)?;
        }
        let file = File::create(&path).map_err(output_err)?;

        Ok(Self {
            writer: table_writer(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header and all rows, then flushes. Consumes the sink.
    pub fn write_all(mut self, layout: FieldLayout, records: &[ExtractedRecord]) -> Result<usize> {
        let rows = write_rows(&mut self.writer, layout, records)?;
        self.writer.flush().map_err(|source| ScanError::Output {
            path: self.path.clone(),
            source,
        })?;

        info!("Wrote {} rows to {}", rows, self.path.display());
        Ok(rows)
    }
}

/// Writes a full table to any `Write` target.
pub fn write_table<W: Write>(
    target: W,
    layout: FieldLayout,
    records: &[ExtractedRecord],
) -> Result<usize> {
    let mut writer = table_writer(target);
    let rows = write_rows(&mut writer, layout, records)?;
    writer.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

fn table_writer<W: Write>(target: W) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(target)
}

fn write_rows<W: Write>(
    writer: &mut Writer<W>,
    layout: FieldLayout,
    records: &[ExtractedRecord],
) -> Result<usize> {
    writer.write_record(layout.fields())?;
    for record in records {
        writer.write_record(record.values())?;
    }
    Ok(records.len())
}
