//! Data output writers
//!
//! A run accumulates every flattened row into a [`SeasonDataset`] and hands it
//! to a [`TabularSink`] exactly once, after the last game.

use crate::PitchEventRow;
use std::path::Path;
use tracing::info;

pub mod csv;

pub use self::csv::{CsvPitchWriter, CsvSink};

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Generic output writer trait
pub trait OutputWriter {
    /// Flush any buffered data to disk
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}

/// Trait for writing pitch rows
pub trait PitchWriter: OutputWriter {
    /// Write a single pitch row to output
    fn write_row(&mut self, row: &PitchEventRow) -> OutputResult<()>;

    /// Write multiple pitch rows at once
    fn write_rows(&mut self, rows: &[PitchEventRow]) -> OutputResult<()> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }
}

/// Destination for a finished dataset.
///
/// Implementations replace whatever exists at `destination` and always emit
/// the column header, even for zero rows.
pub trait TabularSink {
    /// Write all `rows`, in order, to `destination`
    fn write_table(&mut self, rows: &[PitchEventRow], destination: &Path) -> OutputResult<()>;
}

/// Ordered in-memory collection of a run's pitch rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonDataset {
    rows: Vec<PitchEventRow>,
}

impl SeasonDataset {
    /// Empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows, keeping their order. Returns how many were appended.
    pub fn collect<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = PitchEventRow>,
    {
        let before = self.rows.len();
        self.rows.extend(rows);
        self.rows.len() - before
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were collected
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in collection order
    pub fn rows(&self) -> &[PitchEventRow] {
        &self.rows
    }

    /// Write the dataset through `sink`, replacing `destination`
    pub fn persist(&self, sink: &mut dyn TabularSink, destination: &Path) -> OutputResult<usize> {
        sink.write_table(&self.rows, destination)?;
        info!(
            rows = self.rows.len(),
            destination = %destination.display(),
            "Season dataset persisted"
        );
        Ok(self.rows.len())
    }
}

impl FromIterator<PitchEventRow> for SeasonDataset {
    fn from_iter<I: IntoIterator<Item = PitchEventRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
