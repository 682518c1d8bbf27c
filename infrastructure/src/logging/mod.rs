//! Logging infrastructure: the ballot audit log.
//!
//! Provides [`TextAuditLog`], an append-only text file writer that implements
//! the [`AuditSink`](ballot_application::AuditSink) port.

mod audit_log;

pub use audit_log::TextAuditLog;
