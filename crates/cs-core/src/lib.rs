//! Core data models and tier-escalation engine for CyberScope.
//!
//! CyberScope models a tiered SOC triage workflow: alerts ingested from the
//! threat-intelligence feed sit in the L1 queue, escalate into L2 incidents
//! carrying derived kill chains and attack graphs, and escalate again into
//! L3 campaigns with generated threat-hunting analyses. Everything here is
//! synchronous and deterministic apart from freshly-minted ids and
//! timestamps.

pub mod alert;
pub mod analytics;
pub mod campaign;
pub mod feed;
pub mod graph;
pub mod hunting;
pub mod incident;
pub mod killchain;
pub mod session;
pub mod store;
pub mod testing;

pub use alert::{Alert, AlertChannel, AlertStatus, MitreAttack, Severity, VirusTotalData};
pub use campaign::{Campaign, CampaignStatus, IocMatches, L2Investigation, ThreatHuntingAnalysis};
pub use feed::{FeedError, FeedRecord};
pub use graph::{AttackGraph, ConnectionLabel, GraphOptions};
pub use hunting::generate_threat_analysis;
pub use incident::{Attachment, FileMeta, Incident, IncidentStatus, RelatedAlert, TimelineEvent};
pub use killchain::{active_stage, active_stage_for_campaigns, stage_for_tactic, KillChain, Stage};
pub use session::{
    default_roster, Analyst, FileBackend, InMemoryBackend, Role, Session, SessionBackend,
    SessionError,
};
pub use store::{EscalationError, TriageStore};
