//! Shared fixtures for unit and integration tests.
//!
//! Exposed publicly so downstream crates can exercise the escalation engine
//! against realistic records without hand-building every field.

use crate::alert::{
    Alert, AlertChannel, AlertContext, AlertStatus, MitreAttack, Severity, VirusTotalData,
};
use crate::campaign::{Campaign, CampaignStatus, IocMatches};
use chrono::{TimeZone, Utc};

/// Builds a fully-populated alert with the given id.
///
/// The alert carries a user, host, external source IP, a MITRE technique in
/// the Command and Control tactic, and a VirusTotal lookup with no verdicts,
/// so every derivation path (kill chain, graph, escalation) has material to
/// work with.
pub fn sample_alert(alert_id: &str) -> Alert {
    Alert {
        alert_id: alert_id.to_string(),
        title: "Beaconing to known C2 infrastructure".to_string(),
        alert_type: "Command & Control".to_string(),
        source: AlertChannel::Ndr,
        severity: Severity::High,
        timestamp: Utc.with_ymd_and_hms(2024, 12, 12, 9, 30, 0).unwrap(),
        src_ip: "45.142.120.10".to_string(),
        dest_ip: None,
        user: "j.doe".to_string(),
        host: "HOST-RIYADH-HQ".to_string(),
        location: "Riyadh HQ".to_string(),
        ai_summary: "**Risk Score: 7/10**\n\n**Behavior:** Periodic outbound beacons.\n\n**Evidence:** DNS queries to dynamic domains.\n\n**IR Action:** Isolate host.\n\n**Recommendation:** Escalate to L2.".to_string(),
        ai_risk_score: 70,
        ai_recommendation: "Escalate to L2".to_string(),
        status: AlertStatus::Open,
        context: AlertContext {
            department: "Finance".to_string(),
            user_history: "No prior incidents".to_string(),
            asset_criticality: "High".to_string(),
        },
        mitre_attack: Some(MitreAttack {
            id: "T1071.001".to_string(),
            name: "Application Layer Protocol: Web Protocols".to_string(),
            tactic: "TA0011 - Command and Control".to_string(),
            confidence: 0.87,
            description: "Adversaries may communicate using application layer protocols to blend in with existing traffic.".to_string(),
            references: vec!["https://attack.mitre.org/techniques/T1071/001/".to_string()],
        }),
        virustotal_data: Some(VirusTotalData {
            malicious: 0,
            suspicious: 0,
            clean: 62,
            community_score: -4,
            malicious_vendors_count: "0/62".to_string(),
            ip_address: "45.142.120.10".to_string(),
            asn: Some(208_091),
            organization: Some("XHost Internet Solutions".to_string()),
            country: Some("NL".to_string()),
            ip_range: "45.142.120.0/24".to_string(),
            last_analysis_date: "2024-12-11".to_string(),
            whois: serde_json::Value::Null,
        }),
        description: Some("Outbound connection matching C2 beacon signature".to_string()),
        raw_log: None,
    }
}

/// Builds a minimal active campaign with the given id.
pub fn sample_campaign(campaign_id: &str) -> Campaign {
    Campaign {
        campaign_id: campaign_id.to_string(),
        name: "Operation Quiet Signal".to_string(),
        description: "Coordinated beaconing activity across multiple hosts".to_string(),
        risk_level: Severity::High,
        misp_ioc_matches: IocMatches::default(),
        related_incidents: vec!["INC-2024".to_string()],
        pattern_type: "Targeted Espionage".to_string(),
        status: CampaignStatus::Active,
        l3_notes: String::new(),
        created_by: "L3 Analyst".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 12, 1, 8, 0, 0).unwrap(),
        threat_actor: None,
        mitre_tactics: vec!["TA0011 - Command and Control".to_string()],
        escalated_from_incident_id: None,
        l2_investigation: None,
        threat_analysis: None,
    }
}
