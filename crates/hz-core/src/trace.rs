//! Sample trace sink.
//!
//! One row per recorded step, five space-separated columns:
//!
//! ```text
//! # mu0 mu1 L expected_average log_likelihood
//! # run_id=run-1a2b3c4d5e6f seed=42 config=9f86d081884c
//! 12.5 40.1 7.3 31.9 -14.2
//! ```
//!
//! Lines starting with `#` are comments. Rows are appended and never read
//! back by the sampler.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::model::HazardCurve;

/// Column names, in row order.
pub const TRACE_COLUMNS: [&str; 5] = ["mu0", "mu1", "L", "expected_average", "log_likelihood"];

/// Marker for comment lines.
pub const COMMENT_PREFIX: &str = "#";

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open trace {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One recorded sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord {
    /// Step at which the particle was recorded.
    pub step: u64,
    /// Ensemble slot of the recorded particle.
    pub particle: usize,
    pub mu0: f64,
    pub mu1: f64,
    #[serde(rename = "L")]
    pub length: f64,
    pub expected_average: f64,
    pub log_likelihood: f64,
}

impl TraceRecord {
    pub fn new(step: u64, particle: usize, curve: &HazardCurve, log_likelihood: f64) -> Self {
        let params = curve.params();
        Self {
            step,
            particle,
            mu0: params.mu0(),
            mu1: params.mu1(),
            length: params.length(),
            expected_average: curve.expected_average(),
            log_likelihood,
        }
    }

    /// Values in [`TRACE_COLUMNS`] order.
    pub fn columns(&self) -> [f64; 5] {
        [
            self.mu0,
            self.mu1,
            self.length,
            self.expected_average,
            self.log_likelihood,
        ]
    }

    /// The row as written, without the newline.
    pub fn to_row(&self) -> String {
        let columns = self.columns();
        let mut row = String::with_capacity(96);
        for (idx, value) in columns.iter().enumerate() {
            if idx > 0 {
                row.push(' ');
            }
            row.push_str(&value.to_string());
        }
        row
    }
}

/// Identification written as the second header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceHeader {
    pub run_id: String,
    pub seed: u64,
    pub config_id: String,
}

impl TraceHeader {
    pub fn lines(&self) -> [String; 2] {
        [
            format!("{} {}", COMMENT_PREFIX, TRACE_COLUMNS.join(" ")),
            format!(
                "{} run_id={} seed={} config={}",
                COMMENT_PREFIX, self.run_id, self.seed, self.config_id
            ),
        ]
    }
}

/// Destination for trace records.
pub trait TraceSink {
    fn record(&mut self, record: &TraceRecord) -> Result<(), TraceError>;

    /// Push buffered records to the underlying storage.
    fn flush(&mut self) -> Result<(), TraceError> {
        Ok(())
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn record(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        (**self).record(record)
    }

    fn flush(&mut self) -> Result<(), TraceError> {
        (**self).flush()
    }
}

/// Buffered text writer, flushed every `flush_every` records.
pub struct TraceWriter<W: Write> {
    writer: BufWriter<W>,
    flush_every: usize,
    pending: usize,
    written: u64,
    starts_empty: bool,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            flush_every: 1,
            pending: 0,
            written: 0,
            starts_empty: true,
        }
    }

    /// Flush cadence in records; zero is treated as one.
    pub fn with_flush_every(mut self, records: usize) -> Self {
        self.flush_every = records.max(1);
        self
    }

    /// Whether the destination held no data when opened.
    pub fn starts_empty(&self) -> bool {
        self.starts_empty
    }

    pub fn records_written(&self) -> u64 {
        self.written
    }

    pub fn write_header(&mut self, header: &TraceHeader) -> Result<(), TraceError> {
        for line in header.lines() {
            writeln!(self.writer, "{line}")?;
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, TraceError> {
        self.writer
            .into_inner()
            .map_err(|e| TraceError::Io(e.into_error()))
    }
}

impl TraceWriter<File> {
    /// Open a trace file, truncating unless `append` is set.
    pub fn create(path: &Path, append: bool) -> Result<Self, TraceError> {
        let open_err = |source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        };
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(path).map_err(open_err)?;
        let starts_empty = file.metadata().map_err(open_err)?.len() == 0;

        let mut writer = Self::new(file);
        writer.starts_empty = starts_empty;
        Ok(writer)
    }
}

impl<W: Write> TraceSink for TraceWriter<W> {
    fn record(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        writeln!(self.writer, "{}", record.to_row())?;
        self.written += 1;
        self.pending += 1;
        if self.pending >= self.flush_every {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TraceError> {
        self.writer.flush()?;
        self.pending = 0;
        Ok(())
    }
}

/// In-memory sink.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrace {
    records: Vec<TraceRecord>,
}

impl MemoryTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }
}

impl TraceSink for MemoryTrace {
    fn record(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        self.records.push(*record);
        Ok(())
    }
}
