//! Append-only CSV output.
//!
//! Each call to [`CsvSink::append_rows`] opens the file in append mode, writes
//! one fully serialized buffer, and syncs before returning. A reader opening
//! the file between calls always sees a header followed by whole rows, and a
//! later run against the same path only appends.

use crate::error::Result;
use assetq_core::row::headers;
use assetq_core::{Column, ResultRow};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// UTF-8 byte-order marker written ahead of the header.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Destination for pages of result rows.
pub trait RowSink: Send {
    /// Persist rows. Returns once they are durable.
    fn append_rows(&mut self, rows: &[ResultRow]) -> Result<()>;
}

/// CSV file sink projecting rows through a column layout.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    columns: &'static [Column],
}

impl CsvSink {
    /// Create the file now, truncating any previous content, and write the
    /// marker and header.
    pub fn create(path: impl Into<PathBuf>, columns: &'static [Column]) -> Result<Self> {
        let sink = Self::lazy(path, columns);
        let mut file = File::create(&sink.path)?;
        file.write_all(&sink.preamble()?)?;
        file.flush()?;
        file.sync_all()?;
        tracing::debug!("Created {}", sink.path.display());
        Ok(sink)
    }

    /// Sink whose file is created by the first append, or appended to if it
    /// already exists.
    #[must_use]
    pub fn lazy(path: impl Into<PathBuf>, columns: &'static [Column]) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn preamble(&self) -> Result<Vec<u8>> {
        let mut buffer = BOM.to_vec();
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(headers(self.columns))?;
        writer.flush()?;
        drop(writer);
        Ok(buffer)
    }

    fn serialize(&self, rows: &[ResultRow], with_header: bool) -> Result<Vec<u8>> {
        let mut buffer = if with_header {
            self.preamble()?
        } else {
            Vec::new()
        };
        let mut writer = csv::Writer::from_writer(&mut buffer);
        for row in rows {
            writer.write_record(row.project(self.columns))?;
        }
        writer.flush()?;
        drop(writer);
        Ok(buffer)
    }
}

impl RowSink for CsvSink {
    fn append_rows(&mut self, rows: &[ResultRow]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let fresh = file.metadata()?.len() == 0;

        if rows.is_empty() && !fresh {
            return Ok(());
        }

        let buffer = self.serialize(rows, fresh)?;
        file.write_all(&buffer)?;
        file.flush()?;
        file.sync_all()?;

        tracing::debug!("Appended {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}
