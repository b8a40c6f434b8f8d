//! Incident data models for CyberScope.
//!
//! Incidents are the L2 tier: each is created exactly once, by escalating an
//! alert, and leaves the incident collection only when escalated into a
//! campaign.

use crate::alert::{Alert, MitreAttack, Severity, VirusTotalData};
use crate::graph::AttackGraph;
use crate::killchain::KillChain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an incident in the L2 workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Newly escalated, awaiting an L2 analyst
    Open,
    /// Under active investigation
    InProgress,
    /// Promoted to an L3 campaign
    Escalated,
    /// Closed without escalation
    Closed,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Open => write!(f, "Open"),
            IncidentStatus::InProgress => write!(f, "In Progress"),
            IncidentStatus::Escalated => write!(f, "Escalated"),
            IncidentStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// One event on an incident's investigation timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    /// Wall-clock time of the event (HH:MM).
    pub time: String,
    /// What happened.
    pub event: String,
    /// Attack stage or tactic label the event belongs to.
    pub stage: String,
    /// Host involved.
    pub host: String,
    /// Technique reference ("T1566.001 - Phishing"), when known.
    pub mitre_technique: Option<String>,
}

/// Snapshot of the source alert's threat intelligence, preserved on the
/// incident so nothing is lost when the alert leaves the L1 queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedAlert {
    pub alert_id: String,
    pub alert_type: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub host: String,
    pub src_ip: String,
    pub mitre_attack: Option<MitreAttack>,
    pub virustotal_data: Option<VirusTotalData>,
    pub ai_summary: String,
    pub ai_recommendation: String,
}

impl RelatedAlert {
    /// Captures the threat-intelligence snapshot of an alert.
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            alert_id: alert.alert_id.clone(),
            alert_type: alert.alert_type.clone(),
            timestamp: alert.timestamp,
            user: alert.user.clone(),
            host: alert.host.clone(),
            src_ip: alert.src_ip.clone(),
            mitre_attack: alert.mitre_attack.clone(),
            virustotal_data: alert.virustotal_data.clone(),
            ai_summary: alert.ai_summary.clone(),
            ai_recommendation: alert.ai_recommendation.clone(),
        }
    }
}

/// A security incident under L2 investigation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    /// Unique identifier (INC-nnnn).
    pub incident_id: String,
    /// Incident title.
    pub title: String,
    /// Investigation summary.
    pub summary: String,
    /// Severity copied from the source alert.
    pub severity: Severity,
    /// Current workflow status.
    pub status: IncidentStatus,
    /// Analyst who created the incident.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Source alerts folded into this incident.
    pub related_alerts: Vec<RelatedAlert>,
    /// Technique copied from the source alert.
    pub mitre_attack: Option<MitreAttack>,
    /// VirusTotal lookup copied from the source alert.
    pub virustotal_data: Option<VirusTotalData>,
    /// AI summary copied from the source alert.
    pub ai_summary: String,
    /// L2 analyst assigned, when picked up.
    pub l2_analyst: Option<String>,
    /// L2 investigation notes.
    pub l2_notes: String,
    /// Kill-chain flags derived from the alert's MITRE tactic.
    pub kill_chain: KillChain,
    /// Investigation timeline.
    pub timeline: Vec<TimelineEvent>,
    /// Derived attack graph.
    pub graph: AttackGraph,
}

/// Descriptor for a file offered during an escalation.
///
/// Attachments are summarized for the audit trail but never stored on the
/// created incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileMeta {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type.
    pub mime_type: String,
}

/// Summary of an escalation attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: uuid::Uuid,
    pub name: String,
    /// Human-readable size ("12.50 KB").
    pub size: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub uploaded_by: String,
    pub timestamp: DateTime<Utc>,
}

impl Attachment {
    /// Summarizes a file descriptor into an attachment record.
    pub fn summarize(meta: &FileMeta, uploaded_by: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: meta.name.clone(),
            size: format!("{:.2} KB", meta.size_bytes as f64 / 1024.0),
            mime_type: meta.mime_type.clone(),
            uploaded_by: uploaded_by.to_string(),
            timestamp: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_alert;

    #[test]
    fn test_related_alert_preserves_intelligence() {
        let alert = sample_alert("ALT-000007");
        let related = RelatedAlert::from_alert(&alert);
        assert_eq!(related.alert_id, "ALT-000007");
        assert_eq!(related.mitre_attack, alert.mitre_attack);
        assert_eq!(related.virustotal_data, alert.virustotal_data);
        assert_eq!(related.ai_summary, alert.ai_summary);
    }

    #[test]
    fn test_attachment_size_formatting() {
        let meta = FileMeta {
            name: "pcap-dump.pcapng".to_string(),
            size_bytes: 12_800,
            mime_type: "application/octet-stream".to_string(),
        };
        let attachment = Attachment::summarize(&meta, "analyst", Utc::now());
        assert_eq!(attachment.size, "12.50 KB");
        assert_eq!(attachment.name, "pcap-dump.pcapng");
        assert_eq!(attachment.uploaded_by, "analyst");
    }

    #[test]
    fn test_incident_status_display() {
        assert_eq!(format!("{}", IncidentStatus::Open), "Open");
        assert_eq!(format!("{}", IncidentStatus::InProgress), "In Progress");
        assert_eq!(format!("{}", IncidentStatus::Escalated), "Escalated");
        assert_eq!(format!("{}", IncidentStatus::Closed), "Closed");
    }
}
