//! End-to-end escalation flow: feed record -> L1 alert -> L2 incident ->
//! L3 campaign, checking record conservation at every step.

use chrono::{TimeZone, Utc};
use cs_core::graph::GraphOptions;
use cs_core::killchain::{active_stage_for_campaigns, Stage};
use cs_core::store::{EscalationError, TriageStore};
use cs_core::testing::sample_alert;
use cs_core::{CampaignStatus, IncidentStatus, Severity};

fn seeded_store() -> TriageStore {
    let alerts = vec![
        sample_alert("ALT-000001"),
        sample_alert("ALT-000002"),
        sample_alert("ALT-000003"),
    ];
    TriageStore::new(alerts, Vec::new(), Vec::new(), GraphOptions::default())
}

#[test]
fn full_escalation_conserves_records() {
    let mut store = seeded_store();
    assert_eq!(store.alerts().len(), 3);

    let incident_id = store
        .escalate_alert("ALT-000002", "Confirmed beaconing to C2", &[], "l1.analyst")
        .unwrap();
    assert_eq!(store.alerts().len(), 2);
    assert_eq!(store.incidents().len(), 1);
    assert!(store.find_alert("ALT-000002").is_none());

    let incident = store.find_incident(&incident_id).unwrap();
    assert_eq!(incident.status, IncidentStatus::Open);
    assert_eq!(incident.severity, Severity::High);
    assert!(incident.kill_chain.command_control);

    let campaign_id = store
        .escalate_incident(&incident_id, "Matches wider pattern", &[], "l2.analyst")
        .unwrap();
    assert_eq!(store.alerts().len(), 2);
    assert!(store.incidents().is_empty());
    assert_eq!(store.campaigns().len(), 1);

    let campaign = store.find_campaign(&campaign_id).unwrap();
    assert_eq!(campaign.status, CampaignStatus::Active);
    assert_eq!(campaign.risk_level, Severity::High);
    assert_eq!(campaign.related_incidents, vec![incident_id.clone()]);

    // The original alert's intelligence survives both hops.
    let l2 = campaign.l2_investigation.as_ref().unwrap();
    assert_eq!(l2.related_alerts[0].alert_id, "ALT-000002");
    assert!(l2.related_alerts[0].virustotal_data.is_some());
    assert!(l2.related_alerts[0].mitre_attack.is_some());

    // The generated analysis reflects the C2 tactic and active status.
    let analysis = campaign.threat_analysis.as_ref().unwrap();
    assert_eq!(analysis.ai_confidence, 85);
    assert_eq!(analysis.attack_probability_score, 78);

    // The campaign drives the kill-chain display to the C2 stage.
    assert_eq!(
        active_stage_for_campaigns(store.campaigns()),
        Stage::CommandControl
    );
}

#[test]
fn failed_escalations_change_nothing() {
    let mut store = seeded_store();

    assert_eq!(
        store
            .escalate_alert("ALT-404404", "note", &[], "l1.analyst")
            .unwrap_err(),
        EscalationError::AlertNotFound("ALT-404404".to_string())
    );
    assert_eq!(
        store
            .escalate_incident("INC-404", "note", &[], "l2.analyst")
            .unwrap_err(),
        EscalationError::IncidentNotFound("INC-404".to_string())
    );

    assert_eq!(store.alerts().len(), 3);
    assert!(store.incidents().is_empty());
    assert!(store.campaigns().is_empty());
}

#[test]
fn repeated_runs_produce_identical_derivations() {
    let base = Utc.with_ymd_and_hms(2024, 12, 12, 12, 0, 0).single().unwrap();
    let payload = serde_json::json!([
        {
            "alert": {
                "description": "Outbound beacon to rare domain",
                "source_ip": "45.142.120.10",
                "username": "m.hassan",
                "location": "Jeddah Branch"
            },
            "mitre": {
                "id": "T1071.001",
                "name": "Web Protocols",
                "tactic": "TA0011 - command-and-control",
                "confidence": 0.8,
                "description": "C2 over HTTPS",
                "references": []
            },
            "virustotal": {
                "malicious": 5,
                "suspicious": 2,
                "clean": 55,
                "community_score": -20,
                "malicious_vendors_count": "5/62",
                "ip_address": "45.142.120.10",
                "asn": 208091,
                "organization": "XHost Internet Solutions",
                "country": "NL",
                "ip_range": "45.142.120.0/24",
                "last_analysis_date": "2024-12-11",
                "whois": null
            },
            "llm_response": {
                "risk_score": 8,
                "behavior": "Beaconing",
                "evidence": "Fixed-interval HTTPS",
                "ir_action": "Isolate host",
                "recommendation": "Escalate to L2"
            }
        }
    ])
    .to_string();

    let first = cs_core::feed::alerts_from_feed(&payload, base).unwrap();
    let second = cs_core::feed::alerts_from_feed(&payload, base).unwrap();
    assert_eq!(first, second);

    let mut store = TriageStore::new(first, Vec::new(), Vec::new(), GraphOptions::default());
    let incident_id = store
        .escalate_alert("ALT-000001", "", &[], "l1.analyst")
        .unwrap();
    let incident = store.find_incident(&incident_id).unwrap();

    // Derived structures depend only on the alert contents.
    assert!(incident.kill_chain.command_control);
    assert_eq!(incident.graph.nodes.len(), 4);
    assert_eq!(incident.graph.edges[1].label, "malicious_connection");
}
