//! Threat-intelligence feed ingestion.
//!
//! Deserializes the historical enrichment feed (one JSON array of records,
//! each carrying the raw alert, MITRE mapping, VirusTotal lookup, and LLM
//! assessment) and transforms each record into an [`Alert`] for the L1
//! queue. Every derived field is deterministic given the record, its index,
//! and the caller-supplied base instant.

use crate::alert::{
    Alert, AlertChannel, AlertContext, AlertStatus, MitreAttack, Severity, VirusTotalData,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors produced while loading the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed file could not be read.
    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),
    /// The feed payload is not valid JSON of the expected shape.
    #[error("failed to parse feed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw alert block of a feed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedAlert {
    pub description: String,
    pub source_ip: String,
    pub username: String,
    pub location: String,
}

/// MITRE block of a feed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMitre {
    pub id: String,
    pub name: String,
    pub tactic: String,
    pub confidence: f64,
    pub description: String,
    #[serde(default)]
    pub references: Vec<String>,
}

/// VirusTotal block of a feed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedVirusTotal {
    pub malicious: u32,
    pub suspicious: u32,
    pub clean: u32,
    pub community_score: i64,
    pub malicious_vendors_count: String,
    pub ip_address: String,
    pub asn: Option<i64>,
    pub organization: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub ip_range: String,
    pub last_analysis_date: Option<String>,
    #[serde(default)]
    pub whois: serde_json::Value,
}

/// LLM assessment block of a feed record.
///
/// The feed is inconsistent about the risk score: it may be a number, a
/// numeric string, or the literal "N/A".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedAssessment {
    pub risk_score: serde_json::Value,
    pub behavior: String,
    pub evidence: String,
    pub ir_action: String,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// One record of the enrichment feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRecord {
    pub alert: FeedAlert,
    pub mitre: FeedMitre,
    pub virustotal: FeedVirusTotal,
    pub llm_response: FeedAssessment,
}

impl FeedAssessment {
    /// Risk score on the feed's 0-10 scale; `None` for "N/A" or anything
    /// unparseable.
    pub fn risk_score(&self) -> Option<u8> {
        match &self.risk_score {
            serde_json::Value::Number(n) => n.as_f64().map(|f| f as u8),
            serde_json::Value::String(s) => s.trim().parse::<u8>().ok(),
            _ => None,
        }
    }
}

fn severity_for(score: Option<u8>) -> Severity {
    match score {
        Some(s) if s >= 8 => Severity::Critical,
        Some(s) if s >= 6 => Severity::High,
        Some(s) if s >= 4 => Severity::Medium,
        _ => Severity::Low,
    }
}

fn is_internal_ip(ip: &str) -> bool {
    ip.starts_with("10.") || ip.starts_with("172.16.") || ip.starts_with("192.168.")
}

/// Classifies the source channel of a record.
///
/// The rules run in priority order: XDR for high-risk credential or
/// privilege attacks, EDR for endpoint threat keywords, NDR for external
/// sources and network keywords, SIEM otherwise.
fn classify_channel(record: &FeedRecord) -> AlertChannel {
    let description = record.alert.description.to_lowercase();
    let tactic = record.mitre.tactic.to_lowercase();
    let score = record.llm_response.risk_score().unwrap_or(0);

    if score >= 8
        && (tactic.contains("credential-access") || tactic.contains("privilege-escalation"))
    {
        return AlertChannel::Xdr;
    }

    if description.contains("ransomware")
        || description.contains("macro")
        || description.contains("antivirus")
        || description.contains("powershell")
        || description.contains("encryption")
        || (description.contains("scheduled task") && score >= 5)
    {
        return AlertChannel::Edr;
    }

    if !is_internal_ip(&record.alert.source_ip)
        || description.contains("tor")
        || description.contains("outbound")
        || description.contains("data transfer")
        || description.contains("connection")
        || (description.contains("ssh") && score >= 5)
        || (description.contains("sql") && score >= 6)
    {
        return AlertChannel::Ndr;
    }

    AlertChannel::Siem
}

/// Transforms one feed record into an alert.
///
/// `index` is the zero-based position of the record in the feed; it drives
/// the sequential id and the hourly-descending timestamp from `base_time`.
pub fn alert_from_record(record: &FeedRecord, index: usize, base_time: DateTime<Utc>) -> Alert {
    let score = record.llm_response.risk_score();
    let severity = severity_for(score);
    let recommendation = record
        .llm_response
        .recommendation
        .clone()
        .unwrap_or_default();

    let status = if recommendation.contains("Ignore") {
        AlertStatus::Ignored
    } else {
        AlertStatus::Open
    };

    let host = format!(
        "HOST-{}",
        record
            .alert
            .location
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    );

    let ai_summary = format!(
        "**Risk Score: {}/10**\n\n**Behavior:** {}\n\n**Evidence:** {}\n\n**IR Action:** {}\n\n**Recommendation:** {}",
        score.map_or_else(|| "N/A".to_string(), |s| s.to_string()),
        record.llm_response.behavior,
        record.llm_response.evidence,
        record.llm_response.ir_action,
        recommendation,
    );

    let dest_ip = if record.virustotal.ip_address != record.alert.source_ip {
        Some(record.virustotal.ip_address.clone())
    } else {
        None
    };

    Alert {
        alert_id: format!("ALT-{:06}", index + 1),
        title: format!("{} - {}", record.mitre.name, record.alert.username),
        alert_type: if record.mitre.name.is_empty() {
            "Security Alert".to_string()
        } else {
            record.mitre.name.clone()
        },
        source: classify_channel(record),
        severity,
        timestamp: base_time - Duration::hours(index as i64),
        src_ip: record.alert.source_ip.clone(),
        dest_ip,
        user: record.alert.username.clone(),
        host,
        location: record.alert.location.clone(),
        ai_summary,
        ai_risk_score: score.map_or(50, |s| s.saturating_mul(10)),
        ai_recommendation: if recommendation.is_empty() {
            "Review and monitor for suspicious activity.".to_string()
        } else {
            recommendation
        },
        status,
        context: AlertContext {
            department: record.alert.location.clone(),
            user_history: "Imported from threat intelligence feed".to_string(),
            asset_criticality: if severity >= Severity::High {
                "High".to_string()
            } else {
                "Medium".to_string()
            },
        },
        mitre_attack: Some(MitreAttack {
            id: record.mitre.id.clone(),
            name: record.mitre.name.clone(),
            tactic: record.mitre.tactic.clone(),
            confidence: record.mitre.confidence,
            description: record.mitre.description.clone(),
            references: record.mitre.references.clone(),
        }),
        virustotal_data: Some(VirusTotalData {
            malicious: record.virustotal.malicious,
            suspicious: record.virustotal.suspicious,
            clean: record.virustotal.clean,
            community_score: record.virustotal.community_score,
            malicious_vendors_count: record.virustotal.malicious_vendors_count.clone(),
            // The lookup is keyed by the alert's source IP even when the
            // feed resolved a different address.
            ip_address: record.alert.source_ip.clone(),
            asn: record.virustotal.asn,
            organization: record.virustotal.organization.clone(),
            country: record.virustotal.country.clone(),
            ip_range: record.virustotal.ip_range.clone(),
            last_analysis_date: record
                .virustotal
                .last_analysis_date
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            whois: record.virustotal.whois.clone(),
        }),
        description: Some(record.alert.description.clone()),
        raw_log: serde_json::to_string_pretty(record).ok(),
    }
}

/// Parses a feed payload and transforms every record.
pub fn alerts_from_feed(payload: &str, base_time: DateTime<Utc>) -> Result<Vec<Alert>, FeedError> {
    let records: Vec<FeedRecord> = serde_json::from_str(payload)?;
    let alerts = records
        .iter()
        .enumerate()
        .map(|(index, record)| alert_from_record(record, index, base_time))
        .collect::<Vec<_>>();
    info!(count = alerts.len(), "feed transformed into alert queue");
    Ok(alerts)
}

/// Reads and transforms a feed file.
pub fn load_feed(path: &Path, base_time: DateTime<Utc>) -> Result<Vec<Alert>, FeedError> {
    let payload = std::fs::read_to_string(path)?;
    alerts_from_feed(&payload, base_time)
}
