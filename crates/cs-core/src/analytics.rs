//! Dashboard analytics over the triage tiers.
//!
//! Pure aggregation: kill-chain phase breakdowns for the L1 alert queue and
//! the L3 campaign collection, campaign status counts, and the filter
//! predicates the dashboard exposes.

use crate::alert::{Alert, Severity};
use crate::campaign::{Campaign, CampaignStatus};
use crate::killchain::{stage_for_tactic, Stage, STAGES};

/// Severity (or campaign risk) counts within one kill-chain phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityBreakdown {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// One kill-chain phase with its record count and severity breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBucket {
    pub stage: Stage,
    pub count: usize,
    pub severity: SeverityBreakdown,
}

/// Maps an alert type to the kill-chain phase it represents.
///
/// Types outside the classification table do not contribute to any phase.
pub fn stage_for_alert_type(alert_type: &str) -> Option<Stage> {
    match alert_type {
        "Port Scan" | "Suspicious Login" | "Brute Force Attack" => Some(Stage::Reconnaissance),
        "Malware Detection" => Some(Stage::Weaponization),
        "Phishing Attempt" => Some(Stage::Delivery),
        "SQL Injection" | "Privilege Escalation" => Some(Stage::Exploitation),
        "Lateral Movement" => Some(Stage::Installation),
        "Command & Control" => Some(Stage::CommandControl),
        "Data Exfiltration" => Some(Stage::ActionsObjectives),
        _ => None,
    }
}

/// Buckets the alert queue into the seven kill-chain phases by alert type.
pub fn alert_phase_breakdown(alerts: &[Alert]) -> [PhaseBucket; 7] {
    let mut buckets = empty_buckets();
    for alert in alerts {
        if let Some(stage) = stage_for_alert_type(&alert.alert_type) {
            let bucket = &mut buckets[stage.index()];
            bucket.count += 1;
            bucket.severity.add(alert.severity);
        }
    }
    buckets
}

/// Buckets Active and Monitoring campaigns into the seven phases.
///
/// A campaign contributes to every phase one of its tactics maps to, but at
/// most once per phase.
pub fn campaign_phase_breakdown(campaigns: &[Campaign]) -> [PhaseBucket; 7] {
    let mut buckets = empty_buckets();
    for campaign in campaigns {
        if !matches!(
            campaign.status,
            CampaignStatus::Active | CampaignStatus::Monitoring
        ) {
            continue;
        }
        let mut seen = [false; 7];
        for tactic in &campaign.mitre_tactics {
            let stage = stage_for_tactic(tactic);
            if !seen[stage.index()] {
                seen[stage.index()] = true;
                let bucket = &mut buckets[stage.index()];
                bucket.count += 1;
                bucket.severity.add(campaign.risk_level);
            }
        }
    }
    buckets
}

/// Highest phase holding any records; phase 0 when all are empty.
pub fn highest_populated_stage(buckets: &[PhaseBucket; 7]) -> Stage {
    buckets
        .iter()
        .rev()
        .find(|b| b.count > 0)
        .map(|b| b.stage)
        .unwrap_or(Stage::Reconnaissance)
}

/// Campaign totals shown in the L3 header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignCounts {
    pub total: usize,
    pub active: usize,
    pub monitoring: usize,
    pub resolved: usize,
}

pub fn campaign_counts(campaigns: &[Campaign]) -> CampaignCounts {
    let mut counts = CampaignCounts {
        total: campaigns.len(),
        ..Default::default()
    };
    for campaign in campaigns {
        match campaign.status {
            CampaignStatus::Active => counts.active += 1,
            CampaignStatus::Monitoring => counts.monitoring += 1,
            CampaignStatus::Resolved => counts.resolved += 1,
            CampaignStatus::FalsePositive => {}
        }
    }
    counts
}

/// Filters campaigns by optional status and risk level; `None` matches all.
pub fn filter_campaigns<'a>(
    campaigns: &'a [Campaign],
    status: Option<CampaignStatus>,
    risk: Option<Severity>,
) -> Vec<&'a Campaign> {
    campaigns
        .iter()
        .filter(|c| status.map_or(true, |s| c.status == s))
        .filter(|c| risk.map_or(true, |r| c.risk_level == r))
        .collect()
}

fn empty_buckets() -> [PhaseBucket; 7] {
    STAGES.map(|stage| PhaseBucket {
        stage,
        count: 0,
        severity: SeverityBreakdown::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_alert, sample_campaign};

    #[test]
    fn test_alert_type_classification() {
        assert_eq!(stage_for_alert_type("Port Scan"), Some(Stage::Reconnaissance));
        assert_eq!(stage_for_alert_type("Phishing Attempt"), Some(Stage::Delivery));
        assert_eq!(stage_for_alert_type("Data Exfiltration"), Some(Stage::ActionsObjectives));
        assert_eq!(stage_for_alert_type("Unusual DNS Query"), None);
    }

    #[test]
    fn test_alert_breakdown_counts_and_severity() {
        let mut a = sample_alert("ALT-000001");
        a.alert_type = "Port Scan".to_string();
        a.severity = Severity::Critical;
        let mut b = sample_alert("ALT-000002");
        b.alert_type = "Brute Force Attack".to_string();
        b.severity = Severity::Low;
        let mut c = sample_alert("ALT-000003");
        c.alert_type = "Command & Control".to_string();
        c.severity = Severity::High;

        let buckets = alert_phase_breakdown(&[a, b, c]);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].severity.critical, 1);
        assert_eq!(buckets[0].severity.low, 1);
        assert_eq!(buckets[5].count, 1);
        assert_eq!(buckets[5].severity.high, 1);
        assert_eq!(buckets[6].count, 0);
    }

    #[test]
    fn test_unclassified_alert_types_are_skipped() {
        let mut alert = sample_alert("ALT-000001");
        alert.alert_type = "Unusual DNS Query".to_string();
        let buckets = alert_phase_breakdown(&[alert]);
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_campaign_breakdown_skips_resolved() {
        let mut active = sample_campaign("CMP-0001");
        active.status = CampaignStatus::Active;
        active.mitre_tactics = vec!["TA0011 - Command and Control".to_string()];

        let mut resolved = sample_campaign("CMP-0002");
        resolved.status = CampaignStatus::Resolved;
        resolved.mitre_tactics = vec!["TA0040 - Impact".to_string()];

        let buckets = campaign_phase_breakdown(&[active, resolved]);
        assert_eq!(buckets[5].count, 1);
        assert_eq!(buckets[6].count, 0);
    }

    #[test]
    fn test_campaign_counted_once_per_phase() {
        let mut campaign = sample_campaign("CMP-0003");
        campaign.mitre_tactics = vec![
            "TA0011 - Command and Control".to_string(),
            "c2 beaconing".to_string(),
            "TA0001 - Initial Access".to_string(),
        ];
        let buckets = campaign_phase_breakdown(&[campaign]);
        assert_eq!(buckets[5].count, 1);
        assert_eq!(buckets[2].count, 1);
    }

    #[test]
    fn test_severity_counts_sum_to_bucket_count() {
        let types = [
            "Port Scan",
            "Malware Detection",
            "Phishing Attempt",
            "SQL Injection",
            "Lateral Movement",
            "Command & Control",
            "Data Exfiltration",
            "Port Scan",
        ];
        let severities = [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::High,
            Severity::High,
            Severity::Critical,
            Severity::Medium,
        ];
        let alerts: Vec<_> = types
            .iter()
            .zip(severities)
            .enumerate()
            .map(|(i, (ty, sev))| {
                let mut alert = sample_alert(&format!("ALT-{:06}", i + 1));
                alert.alert_type = ty.to_string();
                alert.severity = sev;
                alert
            })
            .collect();

        for bucket in alert_phase_breakdown(&alerts) {
            let sum = bucket.severity.critical
                + bucket.severity.high
                + bucket.severity.medium
                + bucket.severity.low;
            assert_eq!(sum, bucket.count);
        }
    }

    #[test]
    fn test_highest_populated_stage() {
        let mut alert = sample_alert("ALT-000001");
        alert.alert_type = "Lateral Movement".to_string();
        let buckets = alert_phase_breakdown(&[alert]);
        assert_eq!(highest_populated_stage(&buckets), Stage::Installation);

        let empty = alert_phase_breakdown(&[]);
        assert_eq!(highest_populated_stage(&empty), Stage::Reconnaissance);
    }

    #[test]
    fn test_campaign_counts() {
        let mut a = sample_campaign("CMP-0001");
        a.status = CampaignStatus::Active;
        let mut b = sample_campaign("CMP-0002");
        b.status = CampaignStatus::Monitoring;
        let mut c = sample_campaign("CMP-0003");
        c.status = CampaignStatus::FalsePositive;

        let counts = campaign_counts(&[a, b, c]);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.active, 1);
        assert_eq!(counts.monitoring, 1);
        assert_eq!(counts.resolved, 0);
    }

    #[test]
    fn test_filter_campaigns() {
        let mut a = sample_campaign("CMP-0001");
        a.status = CampaignStatus::Active;
        a.risk_level = Severity::Critical;
        let mut b = sample_campaign("CMP-0002");
        b.status = CampaignStatus::Monitoring;
        b.risk_level = Severity::High;
        let campaigns = vec![a, b];

        assert_eq!(filter_campaigns(&campaigns, None, None).len(), 2);
        assert_eq!(
            filter_campaigns(&campaigns, Some(CampaignStatus::Active), None).len(),
            1
        );
        assert_eq!(
            filter_campaigns(&campaigns, Some(CampaignStatus::Active), Some(Severity::High)).len(),
            0
        );
    }
}
