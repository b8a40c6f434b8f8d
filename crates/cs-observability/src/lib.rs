//! # cs-observability
//!
//! Logging and audit infrastructure for CyberScope.
//!
//! Structured logging via tracing plus a bounded in-memory audit trail of
//! triage operations.

pub mod audit;
pub mod logging;

pub use audit::{AuditEventType, AuditLog, AuditLogEntry, AuditResult};
pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
