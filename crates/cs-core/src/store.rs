//! The triage store: owns the three tier collections and implements the two
//! escalation operations that move work between them.
//!
//! Escalation is conservative by construction: each operation removes exactly
//! one record from the source tier and inserts exactly one into the target
//! tier, or does nothing at all when the id does not resolve.

use crate::alert::{Alert, AlertStatus};
use crate::campaign::{Campaign, CampaignStatus, IocMatches, L2Investigation};
use crate::graph::{AttackGraph, GraphOptions};
use crate::hunting::generate_threat_analysis;
use crate::incident::{Attachment, FileMeta, Incident, IncidentStatus, RelatedAlert, TimelineEvent};
use crate::killchain::KillChain;
use chrono::Utc;
use rand::Rng;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

/// Errors produced by the escalation operations.
///
/// Any error leaves the store completely unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EscalationError {
    /// An empty id was supplied.
    #[error("empty id supplied to escalation")]
    InvalidId,
    /// No alert with the given id exists in the L1 queue.
    #[error("alert {0} not found")]
    AlertNotFound(String),
    /// No incident with the given id exists in the L2 collection.
    #[error("incident {0} not found")]
    IncidentNotFound(String),
}

/// In-memory store of the three triage tiers.
#[derive(Debug, Default)]
pub struct TriageStore {
    alerts: Vec<Alert>,
    incidents: Vec<Incident>,
    campaigns: Vec<Campaign>,
    graph_options: GraphOptions,
}

impl TriageStore {
    /// Creates a store seeded with the given collections.
    pub fn new(
        alerts: Vec<Alert>,
        incidents: Vec<Incident>,
        campaigns: Vec<Campaign>,
        graph_options: GraphOptions,
    ) -> Self {
        Self {
            alerts,
            incidents,
            campaigns,
            graph_options,
        }
    }

    /// L1 alert queue, newest first.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// L2 incident collection, newest first.
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// L3 campaign collection, newest first.
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn find_alert(&self, alert_id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.alert_id == alert_id)
    }

    pub fn find_incident(&self, incident_id: &str) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.incident_id == incident_id)
    }

    pub fn find_campaign(&self, campaign_id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.campaign_id == campaign_id)
    }

    /// Updates the status of an alert without moving it between tiers.
    pub fn set_alert_status(
        &mut self,
        alert_id: &str,
        status: AlertStatus,
    ) -> Result<(), EscalationError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.alert_id == alert_id)
            .ok_or_else(|| EscalationError::AlertNotFound(alert_id.to_string()))?;
        alert.status = status;
        Ok(())
    }

    /// Escalates an L1 alert into a new L2 incident.
    ///
    /// Removes the alert from the queue and inserts a freshly-built incident
    /// at the head of the incident collection, preserving the alert's full
    /// threat intelligence and deriving the kill chain, initial timeline, and
    /// attack graph from it. Attachments are summarized into the log and
    /// dropped. Returns the new incident id.
    pub fn escalate_alert(
        &mut self,
        alert_id: &str,
        note: &str,
        files: &[FileMeta],
        escalated_by: &str,
    ) -> Result<String, EscalationError> {
        if alert_id.is_empty() {
            return Err(EscalationError::InvalidId);
        }
        let position = self
            .alerts
            .iter()
            .position(|a| a.alert_id == alert_id)
            .ok_or_else(|| EscalationError::AlertNotFound(alert_id.to_string()))?;
        let alert = self.alerts.remove(position);

        let now = Utc::now();
        self.log_attachments(files, escalated_by);

        let kill_chain = alert
            .mitre_attack
            .as_ref()
            .map(|m| KillChain::from_tactic(&m.tactic))
            .unwrap_or_default();

        let timeline = vec![TimelineEvent {
            time: now.format("%H:%M").to_string(),
            event: "Incident created via escalation from L1".to_string(),
            stage: alert
                .mitre_tactic()
                .unwrap_or("Initial Access")
                .to_string(),
            host: if alert.host.is_empty() {
                "Unknown".to_string()
            } else {
                alert.host.clone()
            },
            mitre_technique: alert
                .mitre_attack
                .as_ref()
                .map(|m| format!("{} - {}", m.id, m.name)),
        }];

        let graph = AttackGraph::from_alert(&alert, &self.graph_options);

        let summary = if !note.is_empty() {
            note.to_string()
        } else if !alert.ai_summary.is_empty() {
            alert.ai_summary.clone()
        } else {
            "No summary provided".to_string()
        };

        let incident_id = self.next_incident_id();
        let incident = Incident {
            incident_id: incident_id.clone(),
            title: format!("Escalated: {}", alert.title),
            summary,
            severity: alert.severity,
            status: IncidentStatus::Open,
            created_by: escalated_by.to_string(),
            created_at: now,
            updated_at: now,
            related_alerts: vec![RelatedAlert::from_alert(&alert)],
            mitre_attack: alert.mitre_attack.clone(),
            virustotal_data: alert.virustotal_data.clone(),
            ai_summary: alert.ai_summary.clone(),
            l2_analyst: None,
            l2_notes: note.to_string(),
            kill_chain,
            timeline,
            graph,
        };

        info!(
            alert_id = %alert.alert_id,
            incident_id = %incident.incident_id,
            escalated_by = %escalated_by,
            "alert escalated to incident"
        );
        self.incidents.insert(0, incident);
        Ok(incident_id)
    }

    /// Escalates an L2 incident into a new L3 campaign.
    ///
    /// Removes the incident and inserts a freshly-built campaign at the head
    /// of the campaign collection, carrying the complete L2 investigation
    /// snapshot and the tactic set extracted from the incident's timeline.
    /// Attachments are summarized into the log and dropped. Returns the new
    /// campaign id.
    pub fn escalate_incident(
        &mut self,
        incident_id: &str,
        note: &str,
        files: &[FileMeta],
        escalated_by: &str,
    ) -> Result<String, EscalationError> {
        if incident_id.is_empty() {
            return Err(EscalationError::InvalidId);
        }
        let position = self
            .incidents
            .iter()
            .position(|i| i.incident_id == incident_id)
            .ok_or_else(|| EscalationError::IncidentNotFound(incident_id.to_string()))?;
        let incident = self.incidents.remove(position);

        let now = Utc::now();
        self.log_attachments(files, escalated_by);

        let description = if !note.is_empty() {
            note.to_string()
        } else {
            incident.summary.clone()
        };

        let l2_notes = if incident.l2_notes.is_empty() {
            "No L2 notes provided".to_string()
        } else {
            incident.l2_notes.clone()
        };

        let campaign_id = self.next_campaign_id();
        let mut campaign = Campaign {
            campaign_id: campaign_id.clone(),
            name: format!("Investigation: {}", incident.title),
            description,
            risk_level: incident.severity,
            misp_ioc_matches: IocMatches::default(),
            related_incidents: vec![incident.incident_id.clone()],
            pattern_type: "Escalated Investigation".to_string(),
            status: CampaignStatus::Active,
            l3_notes: format!(
                "Escalated from L2 incident {}. {}",
                incident.incident_id, note
            ),
            created_by: escalated_by.to_string(),
            created_at: now,
            threat_actor: None,
            mitre_tactics: extract_tactics(&incident),
            escalated_from_incident_id: Some(incident.incident_id.clone()),
            l2_investigation: Some(L2Investigation {
                analyst: incident
                    .l2_analyst
                    .clone()
                    .unwrap_or_else(|| incident.created_by.clone()),
                notes: l2_notes,
                timeline: incident.timeline.clone(),
                related_alerts: incident.related_alerts.clone(),
                graph: incident.graph.clone(),
                escalation_note: note.to_string(),
                escalation_timestamp: now,
                escalated_by: escalated_by.to_string(),
            }),
            threat_analysis: None,
        };
        campaign.threat_analysis = Some(generate_threat_analysis(&campaign));

        info!(
            incident_id = %incident.incident_id,
            campaign_id = %campaign.campaign_id,
            escalated_by = %escalated_by,
            "incident escalated to campaign"
        );
        self.campaigns.insert(0, campaign);
        Ok(campaign_id)
    }

    fn log_attachments(&self, files: &[FileMeta], uploaded_by: &str) {
        let now = Utc::now();
        for meta in files {
            let attachment = Attachment::summarize(meta, uploaded_by, now);
            info!(
                name = %attachment.name,
                size = %attachment.size,
                mime_type = %attachment.mime_type,
                uploaded_by = %attachment.uploaded_by,
                "escalation attachment recorded"
            );
        }
    }

    fn next_incident_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id = format!("INC-{}", rng.gen_range(0..10_000));
            if self.incidents.iter().all(|i| i.incident_id != id) {
                return id;
            }
        }
    }

    fn next_campaign_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id = format!("CMP-{}", rng.gen_range(0..10_000));
            if self.campaigns.iter().all(|c| c.campaign_id != id) {
                return id;
            }
        }
    }
}

/// Extracts the MITRE tactic set of an incident from its timeline.
///
/// Technique ids on timeline events are mapped to tactics by their prefix,
/// and stage labels are scanned for tactic keywords. The result preserves
/// first-seen order and holds no duplicates.
fn extract_tactics(incident: &Incident) -> Vec<String> {
    let mut tactics: Vec<String> = Vec::new();
    let mut add = |tactics: &mut Vec<String>, tactic: &str| {
        if !tactics.iter().any(|t| t == tactic) {
            tactics.push(tactic.to_string());
        }
    };

    let technique_re = match Regex::new(r"T\d{4}") {
        Ok(re) => re,
        Err(err) => {
            warn!(%err, "technique pattern failed to compile");
            return tactics;
        }
    };

    for event in &incident.timeline {
        if let Some(technique) = &event.mitre_technique {
            if let Some(m) = technique_re.find(technique) {
                let tid = m.as_str();
                if tid.starts_with("T15") {
                    add(&mut tactics, "TA0001 - Initial Access");
                } else if tid.starts_with("T12") {
                    add(&mut tactics, "TA0002 - Execution");
                } else if tid.starts_with("T10") {
                    add(&mut tactics, "TA0004 - Privilege Escalation");
                } else if tid.starts_with("T14") {
                    add(&mut tactics, "TA0006 - Credential Access");
                }
            }
        }

        let stage = event.stage.to_lowercase();
        if stage.contains("access") {
            add(&mut tactics, "TA0001 - Initial Access");
        }
        if stage.contains("execution") {
            add(&mut tactics, "TA0002 - Execution");
        }
        if stage.contains("privilege") {
            add(&mut tactics, "TA0004 - Privilege Escalation");
        }
        if stage.contains("credential") {
            add(&mut tactics, "TA0006 - Credential Access");
        }
        if stage.contains("command") || stage.contains("c2") {
            add(&mut tactics, "TA0011 - Command and Control");
        }
        if stage.contains("impact") {
            add(&mut tactics, "TA0040 - Impact");
        }
        if stage.contains("exfiltration") {
            add(&mut tactics, "TA0010 - Exfiltration");
        }
    }

    tactics
}
