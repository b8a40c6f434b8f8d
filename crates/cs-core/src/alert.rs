//! Alert data models for CyberScope.
//!
//! Alerts are the L1 tier of the triage workflow: flat records produced by
//! transforming the threat-intelligence feed at startup, consumed read-only
//! by the presentation layer, and removed only when escalated to L2.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of an alert; also used as the risk level of a campaign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity - requires attention
    High,
    /// Critical - immediate response required
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

/// Lifecycle status of an alert in the L1 queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Awaiting triage
    Open,
    /// Dismissed by an L1 analyst
    Ignored,
    /// Promoted to an L2 incident
    Escalated,
    /// Closed without action
    Closed,
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertStatus::Open => write!(f, "Open"),
            AlertStatus::Ignored => write!(f, "Ignored"),
            AlertStatus::Escalated => write!(f, "Escalated"),
            AlertStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// Source channel that produced an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertChannel {
    /// Security information and event management
    Siem,
    /// Endpoint detection and response
    Edr,
    /// Extended detection and response
    Xdr,
    /// Network detection and response
    Ndr,
    /// Email security gateway
    EmailGateway,
    /// Perimeter firewall
    Firewall,
}

impl std::fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertChannel::Siem => write!(f, "SIEM"),
            AlertChannel::Edr => write!(f, "EDR"),
            AlertChannel::Xdr => write!(f, "XDR"),
            AlertChannel::Ndr => write!(f, "NDR"),
            AlertChannel::EmailGateway => write!(f, "Email Gateway"),
            AlertChannel::Firewall => write!(f, "Firewall"),
        }
    }
}

/// MITRE ATT&CK technique attached to an alert by the enrichment pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MitreAttack {
    /// Technique ID (e.g., T1566.001)
    pub id: String,
    /// Technique name
    pub name: String,
    /// Tactic label (e.g., "TA0001 - Initial Access")
    pub tactic: String,
    /// Confidence in this mapping (0.0 - 1.0)
    pub confidence: f64,
    /// Technique description
    pub description: String,
    /// Reference URLs
    pub references: Vec<String>,
}

/// VirusTotal reputation lookup for the alert's source IP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VirusTotalData {
    /// Vendors flagging the indicator as malicious.
    pub malicious: u32,
    /// Vendors flagging the indicator as suspicious.
    pub suspicious: u32,
    /// Vendors reporting the indicator as clean.
    pub clean: u32,
    /// Community reputation score.
    pub community_score: i64,
    /// Free-text vendor count summary from the upstream feed.
    pub malicious_vendors_count: String,
    /// The IP the lookup was performed for.
    pub ip_address: String,
    /// Autonomous system number, when resolved.
    pub asn: Option<i64>,
    /// Owning organization, when resolved.
    pub organization: Option<String>,
    /// Country of the IP range.
    pub country: Option<String>,
    /// CIDR range the IP belongs to.
    pub ip_range: String,
    /// Date of the most recent analysis.
    pub last_analysis_date: String,
    /// Raw WHOIS payload.
    pub whois: serde_json::Value,
}

/// Business context carried alongside an alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertContext {
    /// Department or site the affected asset belongs to.
    pub department: String,
    /// Summary of the user's history with the SOC.
    pub user_history: String,
    /// Criticality classification of the asset.
    pub asset_criticality: String,
}

/// A security alert in the L1 queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// Unique identifier (ALT-nnnnnn).
    pub alert_id: String,
    /// Alert title/summary.
    pub title: String,
    /// Alert type/category.
    pub alert_type: String,
    /// Channel that produced the alert.
    pub source: AlertChannel,
    /// Severity level.
    pub severity: Severity,
    /// When the alert fired.
    pub timestamp: DateTime<Utc>,
    /// Source IP of the activity.
    pub src_ip: String,
    /// Destination IP, when distinct from the source.
    pub dest_ip: Option<String>,
    /// Account involved.
    pub user: String,
    /// Hostname involved.
    pub host: String,
    /// Physical/logical location of the asset.
    pub location: String,
    /// AI-generated markdown summary with fixed section headers
    /// (Risk Score, Behavior, Evidence, IR Action, Recommendation).
    pub ai_summary: String,
    /// AI risk score (0 - 100).
    pub ai_risk_score: u8,
    /// AI-recommended next step.
    pub ai_recommendation: String,
    /// Lifecycle status.
    pub status: AlertStatus,
    /// Business context.
    pub context: AlertContext,
    /// MITRE ATT&CK technique, when mapped.
    pub mitre_attack: Option<MitreAttack>,
    /// VirusTotal lookup, when performed.
    pub virustotal_data: Option<VirusTotalData>,
    /// Raw alert description from the source channel.
    pub description: Option<String>,
    /// Raw log payload for forensics.
    pub raw_log: Option<String>,
}

impl Alert {
    /// Returns the MITRE tactic label, when a technique is attached.
    pub fn mitre_tactic(&self) -> Option<&str> {
        self.mitre_attack.as_ref().map(|m| m.tactic.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        let back: Severity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, Severity::High);
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(format!("{}", AlertChannel::Siem), "SIEM");
        assert_eq!(format!("{}", AlertChannel::EmailGateway), "Email Gateway");
    }

    #[test]
    fn test_alert_status_serialization() {
        let statuses = vec![
            (AlertStatus::Open, "\"open\""),
            (AlertStatus::Ignored, "\"ignored\""),
            (AlertStatus::Escalated, "\"escalated\""),
            (AlertStatus::Closed, "\"closed\""),
        ];
        for (status, expected) in statuses {
            assert_eq!(serde_json::to_string(&status).unwrap(), expected);
            let back: AlertStatus = serde_json::from_str(expected).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_mitre_tactic_accessor() {
        let mut alert = crate::testing::sample_alert("ALT-000001");
        assert_eq!(alert.mitre_tactic(), Some("TA0011 - Command and Control"));
        alert.mitre_attack = None;
        assert_eq!(alert.mitre_tactic(), None);
    }
}
