//! Campaign data models for CyberScope.
//!
//! Campaigns are the L3 tier: multi-incident threat-hunting investigations,
//! created by escalating an incident and carrying the full L2 investigation
//! snapshot forward so no evidence is lost across the tier boundary.

use crate::alert::Severity;
use crate::graph::AttackGraph;
use crate::incident::{RelatedAlert, TimelineEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a campaign in the L3 workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Under active threat hunting
    Active,
    /// Contained, watched for resurgence
    Monitoring,
    /// Investigation concluded
    Resolved,
    /// Determined not to be a real campaign
    FalsePositive,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Active => write!(f, "Active"),
            CampaignStatus::Monitoring => write!(f, "Monitoring"),
            CampaignStatus::Resolved => write!(f, "Resolved"),
            CampaignStatus::FalsePositive => write!(f, "False Positive"),
        }
    }
}

/// Indicator-of-compromise matches against the threat-sharing platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IocMatches {
    pub ips: Vec<String>,
    pub domains: Vec<String>,
    pub hashes: Vec<String>,
    pub emails: Vec<String>,
}

impl IocMatches {
    /// Total indicator count across all categories.
    pub fn total(&self) -> usize {
        self.ips.len() + self.domains.len() + self.hashes.len() + self.emails.len()
    }
}

/// The L2 investigation record preserved on a campaign at escalation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct L2Investigation {
    /// Analyst who ran the L2 investigation.
    pub analyst: String,
    /// Investigation notes carried over from the incident.
    pub notes: String,
    /// Full incident timeline.
    pub timeline: Vec<TimelineEvent>,
    /// Source alert snapshots.
    pub related_alerts: Vec<RelatedAlert>,
    /// Derived attack graph.
    pub graph: AttackGraph,
    /// Note attached to the escalation itself.
    pub escalation_note: String,
    /// When the escalation happened.
    pub escalation_timestamp: DateTime<Utc>,
    /// Analyst who escalated.
    pub escalated_by: String,
}

/// Proactive threat-hunting intelligence generated for a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreatHuntingAnalysis {
    /// MITRE ATT&CK technique ID.
    pub technique_id: String,
    /// Technique name.
    pub technique_name: String,
    /// Tactic category the technique belongs to.
    pub threat_impact: String,
    /// Confidence score, 1-100.
    pub ai_confidence: u8,
    /// Short explanation of the technique.
    pub technique_description: String,
    /// Realistic SOC detection methods.
    pub detection_strategies: Vec<String>,
    /// Predicted next adversary steps.
    pub ttp_prediction: Vec<String>,
    /// Likelihood of escalation, as a percentage.
    pub attack_probability_score: u8,
    /// Pre-attack and early compromise evidence to hunt for.
    pub early_indicators: Vec<String>,
    /// Recommended proactive action.
    pub recommended_action: String,
}

/// An L3 threat-hunting campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    /// Unique identifier (CMP-nnnn).
    pub campaign_id: String,
    /// Campaign name.
    pub name: String,
    /// Campaign description.
    pub description: String,
    /// Risk level; shares the alert severity scale.
    pub risk_level: Severity,
    /// Indicator matches against the threat-sharing platform.
    pub misp_ioc_matches: IocMatches,
    /// Incidents folded into this campaign.
    pub related_incidents: Vec<String>,
    /// Attack pattern classification.
    pub pattern_type: String,
    /// Current workflow status.
    pub status: CampaignStatus,
    /// L3 hunting notes.
    pub l3_notes: String,
    /// Analyst who created the campaign.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Attributed threat actor, when known.
    pub threat_actor: Option<String>,
    /// MITRE tactic labels observed in this campaign.
    pub mitre_tactics: Vec<String>,
    /// Incident this campaign was escalated from, when created by escalation.
    pub escalated_from_incident_id: Option<String>,
    /// L2 investigation snapshot, when created by escalation.
    pub l2_investigation: Option<L2Investigation>,
    /// Generated threat-hunting intelligence.
    pub threat_analysis: Option<ThreatHuntingAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_campaign;

    #[test]
    fn test_ioc_total() {
        let iocs = IocMatches {
            ips: vec!["45.142.120.10".to_string(), "193.106.191.77".to_string()],
            domains: vec!["secure-login-portal.com".to_string()],
            hashes: vec![],
            emails: vec!["noreply@secure-login-portal.com".to_string()],
        };
        assert_eq!(iocs.total(), 4);
        assert_eq!(IocMatches::default().total(), 0);
    }

    #[test]
    fn test_campaign_status_display() {
        assert_eq!(format!("{}", CampaignStatus::FalsePositive), "False Positive");
        assert_eq!(format!("{}", CampaignStatus::Monitoring), "Monitoring");
    }

    #[test]
    fn test_campaign_serialization_round_trip() {
        let campaign = sample_campaign("CMP-1234");
        let json = serde_json::to_string(&campaign).unwrap();
        let back: Campaign = serde_json::from_str(&json).unwrap();
        assert_eq!(back, campaign);
    }
}
