//! Audit log port
//!
//! Append-only record of ballot lifecycle events. This is separate from
//! `tracing` output: tracing carries diagnostics, the audit log carries the
//! per-voter breakdown of every ballot for later review.

use ballot_domain::{AUDIT_SEPARATOR, Decision};
use chrono::{DateTime, Local};
use thiserror::Error;

/// Lifecycle event recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditTag {
    Initiated,
    Passed,
    Failed,
}

impl AuditTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditTag::Initiated => "INITIATED",
            AuditTag::Passed => "PASSED",
            AuditTag::Failed => "FAILED",
        }
    }
}

impl From<&Decision> for AuditTag {
    fn from(decision: &Decision) -> Self {
        if decision.passed {
            AuditTag::Passed
        } else {
            AuditTag::Failed
        }
    }
}

impl std::fmt::Display for AuditTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit entry
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub timestamp: DateTime<Local>,
    pub tag: AuditTag,
    /// Multi-line vote summary
    pub summary: String,
}

impl AuditRecord {
    /// Create a record stamped with the current local time
    pub fn new(tag: AuditTag, summary: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            tag,
            summary: summary.into(),
        }
    }

    /// Text block appended to the log: blank line, header, summary, separator.
    pub fn render(&self) -> String {
        format!(
            "\n[{}] Vote {}\n{}\n{}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.tag,
            self.summary,
            AUDIT_SEPARATOR
        )
    }
}

/// Errors from writing the audit log
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for the audit log
///
/// Failures are logged by the caller and never affect voting.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl AuditSink for NoAuditLog {
    fn append(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_format() {
        let record = AuditRecord {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 13, 4, 5).unwrap(),
            tag: AuditTag::Passed,
            summary: "Command: /time set day\nResult: PASSED".to_string(),
        };
        assert_eq!(
            record.render(),
            "\n[2024-05-01 13:04:05] Vote PASSED\nCommand: /time set day\nResult: PASSED\n\
             ----------------------------------------\n"
        );
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(AuditTag::Initiated.to_string(), "INITIATED");
        assert_eq!(AuditTag::Failed.as_str(), "FAILED");
    }
}
