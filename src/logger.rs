//! Access log sink
//!
//! One line per handled request, appended in arrival order. Writers are
//! serialized so concurrent connections never interleave partial lines.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Context;
use parking_lot::Mutex;

/// What gets recorded for each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub client: String,
    pub method: String,
    pub path: String,
    pub status: u16,
}

impl AccessRecord {
    /// Formats the record as a log line stamped with `at`, without newline.
    pub fn format_line(&self, at: SystemTime) -> String {
        format!(
            "{} {} \"{} {}\" {}",
            httpdate::fmt_http_date(at),
            self.client,
            self.method,
            self.path,
            self.status
        )
    }
}

pub trait RequestLogger: Send + Sync {
    fn record(&self, record: &AccessRecord);
}

/// Appends access records to a file.
pub struct FileLogger {
    file: Mutex<File>,
}

impl FileLogger {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RequestLogger for FileLogger {
    fn record(&self, record: &AccessRecord) {
        tracing::info!(
            client = %record.client,
            method = %record.method,
            path = %record.path,
            status = record.status,
            "Request handled"
        );

        let line = record.format_line(SystemTime::now());
        let mut file = self.file.lock();
        if let Err(e) = writeln!(file, "{}", line) {
            tracing::warn!(error = %e, "Failed to write access log");
        }
    }
}

/// Keeps records in memory.
#[derive(Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<AccessRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AccessRecord> {
        self.records.lock().clone()
    }
}

impl RequestLogger for MemoryLogger {
    fn record(&self, record: &AccessRecord) {
        self.records.lock().push(record.clone());
    }
}
