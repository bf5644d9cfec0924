//! CSV output writer implementation

use crate::PitchEventRow;
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, OutputWriter, PitchWriter, TabularSink};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// CSV writer for pitch rows
///
/// The column header is written when the writer is created, so a file with
/// zero rows still carries it. Existing files are truncated.
pub struct CsvPitchWriter {
    writer: Writer<BufWriter<File>>,
    rows_written: u64,
}

impl CsvPitchWriter {
    /// Create a new CSV pitch writer
    ///
    /// # Arguments
    /// * `path` - Output file path; missing parent directories are created
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        Self::new_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new CSV pitch writer with custom buffer size
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `buffer_size` - Size of write buffer in bytes
    pub fn new_with_buffer_size<P: AsRef<Path>>(
        path: P,
        buffer_size: usize,
    ) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV writer: path={}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {}", e)))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

        let buf_writer = BufWriter::with_capacity(buffer_size, file);
        let mut csv_writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(buf_writer);

        csv_writer
            .write_record(PitchEventRow::COLUMNS)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {}", e)))?;

        debug!("CSV writer created with header");

        Ok(Self {
            writer: csv_writer,
            rows_written: 0,
        })
    }

    /// Get number of rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl PitchWriter for CsvPitchWriter {
    fn write_row(&mut self, row: &PitchEventRow) -> OutputResult<()> {
        self.writer
            .serialize(row)
            .map_err(|e| OutputError::CsvError(format!("Failed to write row: {}", e)))?;

        self.rows_written += 1;

        // Flush periodically (every 10000 rows)
        if self.rows_written % 10_000 == 0 {
            self.flush()?;
            debug!("Progress: {} rows written", self.rows_written);
        }

        Ok(())
    }
}

impl OutputWriter for CsvPitchWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))
    }

    fn close(mut self) -> OutputResult<()> {
        debug!("Closing CSV writer: {} total rows written", self.rows_written);

        self.flush()?;

        let buf_writer = self.writer.into_inner().map_err(|e| {
            OutputError::IoError(format!("Failed to get inner writer: {}", e))
        })?;

        let file = buf_writer.into_inner().map_err(|e| {
            OutputError::IoError(format!("Failed to get file handle: {}", e))
        })?;

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))?;

        info!("CSV writer closed successfully: {} rows written", self.rows_written);
        Ok(())
    }
}

/// [`TabularSink`] writing one CSV file per dataset
#[derive(Debug, Clone, Copy)]
pub struct CsvSink {
    buffer_size: usize,
}

impl CsvSink {
    /// Sink with the default write buffer
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Sink with a custom write buffer size in bytes
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

impl Default for CsvSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularSink for CsvSink {
    fn write_table(&mut self, rows: &[PitchEventRow], destination: &Path) -> OutputResult<()> {
        let mut writer = CsvPitchWriter::new_with_buffer_size(destination, self.buffer_size)?;
        writer.write_rows(rows)?;
        writer.close()
    }
}
