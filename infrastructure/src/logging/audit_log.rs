//! Text file writer for the ballot audit log.
//!
//! Each [`AuditRecord`] is rendered as a timestamped block followed by a
//! separator line and appended to the file via a buffered writer.

use ballot_application::ports::audit_log::{AuditError, AuditRecord, AuditSink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only audit log file.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Every entry is flushed as soon
/// as it is written.
pub struct TextAuditLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl TextAuditLog {
    /// Open (or create) the log at `path`, keeping existing entries.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for TextAuditLog {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writer.write_all(record.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for TextAuditLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
