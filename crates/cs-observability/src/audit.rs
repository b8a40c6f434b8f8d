//! Audit trail for triage operations.
//!
//! Every tier transition, status change, and analyst switch lands here as a
//! structured entry, bounded in memory and mirrored to tracing.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::info;
use uuid::Uuid;

/// An entry in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry ID.
    pub id: Uuid,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event_type: AuditEventType,
    /// Actor (analyst id or system component).
    pub actor: String,
    /// Triage entity the event concerns (ALT-/INC-/CMP- id), if any.
    pub entity_id: Option<String>,
    /// Description of the event.
    pub description: String,
    /// Additional details.
    pub details: serde_json::Value,
    /// Result/outcome.
    pub result: AuditResult,
}

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Application startup/shutdown.
    SystemLifecycle,
    /// Configuration change.
    ConfigChange,
    /// Feed loaded into the L1 queue.
    DatasetLoaded,
    /// Alert escalated to an incident.
    AlertEscalated,
    /// Incident escalated to a campaign.
    IncidentEscalated,
    /// Alert status changed without escalation.
    AlertStatusChanged,
    /// Active analyst switched.
    AnalystSwitched,
    /// Custom event.
    Custom(String),
}

/// Result of an audited operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    Success,
    Failure(String),
}

/// Bounded in-memory audit log.
pub struct AuditLog {
    entries: RwLock<VecDeque<AuditLogEntry>>,
    max_entries: usize,
    log_to_tracing: bool,
}

impl AuditLog {
    /// Creates a new audit log.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            max_entries,
            log_to_tracing: true,
        }
    }

    /// Creates an audit log without tracing output.
    pub fn without_tracing(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            max_entries,
            log_to_tracing: false,
        }
    }

    /// Logs an audit entry, evicting the oldest when full.
    pub fn log(&self, entry: AuditLogEntry) {
        if self.log_to_tracing {
            info!(
                event_type = ?entry.event_type,
                actor = %entry.actor,
                entity_id = ?entry.entity_id,
                result = ?entry.result,
                "Audit: {}",
                entry.description
            );
        }

        let mut entries = self.entries.write();
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Logs an event without an associated triage entity.
    pub fn log_event(
        &self,
        event_type: AuditEventType,
        actor: &str,
        description: &str,
        result: AuditResult,
    ) {
        self.log(AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            actor: actor.to_string(),
            entity_id: None,
            description: description.to_string(),
            details: serde_json::json!({}),
            result,
        });
    }

    /// Logs an event against a triage entity.
    pub fn log_entity_event(
        &self,
        event_type: AuditEventType,
        actor: &str,
        entity_id: &str,
        description: &str,
        details: serde_json::Value,
        result: AuditResult,
    ) {
        self.log(AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            actor: actor.to_string(),
            entity_id: Some(entity_id.to_string()),
            description: description.to_string(),
            details,
            result,
        });
    }

    /// Gets all entries, oldest first.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.read().iter().cloned().collect()
    }

    /// Gets entries for a specific triage entity.
    pub fn entries_for(&self, entity_id: &str) -> Vec<AuditLogEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.entity_id.as_deref() == Some(entity_id))
            .cloned()
            .collect()
    }

    /// Gets entries by event type.
    pub fn entries_by_type(&self, event_type: &AuditEventType) -> Vec<AuditLogEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| &e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Gets entries by actor.
    pub fn entries_by_actor(&self, actor: &str) -> Vec<AuditLogEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.actor == actor)
            .cloned()
            .collect()
    }

    /// Exports entries as JSON.
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(10000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        let audit_log = AuditLog::without_tracing(100);

        audit_log.log_event(
            AuditEventType::SystemLifecycle,
            "system",
            "Application started",
            AuditResult::Success,
        );

        let entries = audit_log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_type, AuditEventType::SystemLifecycle);
    }

    #[test]
    fn test_entity_event() {
        let audit_log = AuditLog::without_tracing(100);

        audit_log.log_entity_event(
            AuditEventType::AlertEscalated,
            "3",
            "ALT-000042",
            "Alert escalated to incident",
            serde_json::json!({"incident_id": "INC-7711"}),
            AuditResult::Success,
        );

        let entries = audit_log.entries_for("ALT-000042");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, "3");
    }

    #[test]
    fn test_max_entries() {
        let audit_log = AuditLog::without_tracing(5);

        for i in 0..10 {
            audit_log.log_event(
                AuditEventType::Custom(format!("event-{}", i)),
                "test",
                &format!("Event {}", i),
                AuditResult::Success,
            );
        }

        assert_eq!(audit_log.len(), 5);

        // First events should have been evicted
        let entries = audit_log.entries();
        assert!(matches!(
            &entries[0].event_type,
            AuditEventType::Custom(s) if s == "event-5"
        ));
    }

    #[test]
    fn test_get_by_actor() {
        let audit_log = AuditLog::without_tracing(100);

        audit_log.log_event(
            AuditEventType::AnalystSwitched,
            "5",
            "Switched analyst",
            AuditResult::Success,
        );
        audit_log.log_event(
            AuditEventType::DatasetLoaded,
            "system",
            "Feed loaded",
            AuditResult::Success,
        );

        assert_eq!(audit_log.entries_by_actor("5").len(), 1);
        assert_eq!(audit_log.entries_by_actor("system").len(), 1);
    }

    #[test]
    fn test_failure_result_preserved() {
        let audit_log = AuditLog::without_tracing(100);

        audit_log.log_entity_event(
            AuditEventType::AlertEscalated,
            "3",
            "ALT-999999",
            "Escalation rejected",
            serde_json::json!({}),
            AuditResult::Failure("alert ALT-999999 not found".to_string()),
        );

        let entries = audit_log.entries_by_type(&AuditEventType::AlertEscalated);
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0].result, AuditResult::Failure(_)));
    }

    #[test]
    fn test_export_json() {
        let audit_log = AuditLog::without_tracing(100);

        audit_log.log_event(
            AuditEventType::SystemLifecycle,
            "system",
            "Test event",
            AuditResult::Success,
        );

        let json = audit_log.export_json();
        assert!(json.contains("system_lifecycle"));
    }
}
