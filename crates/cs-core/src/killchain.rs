//! Cyber kill chain derivation and stage inference.
//!
//! Two pure mappings live here:
//!
//! 1. [`KillChain::from_tactic`] - maps a MITRE tactic label onto the 7-flag
//!    kill-chain record stored on incidents (used at alert escalation).
//! 2. [`stage_for_tactic`] / [`active_stage`] - the shared stage-inference
//!    function used by the L3 analytics: tactic label -> stage 0-6, and
//!    highest active stage across a set of tactics or campaigns.
//!
//! Both are total: a label matching no keyword leaves the chain untouched
//! and infers stage 0.

use crate::campaign::{Campaign, CampaignStatus};
use serde::{Deserialize, Serialize};

/// The seven stages of the cyber kill chain as boolean activation flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KillChain {
    pub reconnaissance: bool,
    pub weaponization: bool,
    pub delivery: bool,
    pub exploitation: bool,
    pub installation: bool,
    pub command_control: bool,
    pub actions_objectives: bool,
}

impl KillChain {
    /// Derives kill-chain flags from a MITRE tactic label.
    ///
    /// Matching is case-insensitive substring containment. Some keywords set
    /// two flags at once: initial access implies both delivery and
    /// exploitation. A label with no matching keyword yields the identity
    /// (all flags false).
    pub fn from_tactic(tactic: &str) -> Self {
        let mut chain = Self::default();
        let t = tactic.to_lowercase();

        if t.contains("collection") || t.contains("discovery") || t.contains("reconnaissance") {
            chain.reconnaissance = true;
        }
        if t.contains("resource") || t.contains("weaponization") {
            chain.weaponization = true;
        }
        if t.contains("initial") || t.contains("execution") || t.contains("delivery") {
            chain.delivery = true;
            chain.exploitation = true;
        }
        if t.contains("privilege") || t.contains("credential") || t.contains("exploitation") {
            chain.exploitation = true;
        }
        if t.contains("persistence") || t.contains("installation") {
            chain.installation = true;
        }
        if t.contains("command") || t.contains("c2") || t.contains("control") {
            chain.command_control = true;
        }
        if t.contains("impact") || t.contains("exfiltration") {
            chain.actions_objectives = true;
        }

        chain
    }

    /// Folds several tactic labels into one record by logical OR.
    pub fn from_tactics<'a>(tactics: impl IntoIterator<Item = &'a str>) -> Self {
        tactics
            .into_iter()
            .fold(Self::default(), |acc, t| acc.merge(Self::from_tactic(t)))
    }

    /// Combines two records; flags are never cleared once set.
    pub fn merge(self, other: Self) -> Self {
        Self {
            reconnaissance: self.reconnaissance || other.reconnaissance,
            weaponization: self.weaponization || other.weaponization,
            delivery: self.delivery || other.delivery,
            exploitation: self.exploitation || other.exploitation,
            installation: self.installation || other.installation,
            command_control: self.command_control || other.command_control,
            actions_objectives: self.actions_objectives || other.actions_objectives,
        }
    }

    /// True when no stage is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A kill-chain stage, numbered 0 (Reconnaissance) through 6 (Actions on
/// Objectives).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Reconnaissance = 0,
    Weaponization = 1,
    Delivery = 2,
    Exploitation = 3,
    Installation = 4,
    CommandControl = 5,
    ActionsObjectives = 6,
}

/// All stages in chain order.
pub const STAGES: [Stage; 7] = [
    Stage::Reconnaissance,
    Stage::Weaponization,
    Stage::Delivery,
    Stage::Exploitation,
    Stage::Installation,
    Stage::CommandControl,
    Stage::ActionsObjectives,
];

impl Stage {
    /// Numeric stage index (0-6).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Full stage name.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Reconnaissance => "Reconnaissance",
            Stage::Weaponization => "Weaponization",
            Stage::Delivery => "Delivery",
            Stage::Exploitation => "Exploitation",
            Stage::Installation => "Installation",
            Stage::CommandControl => "Command & Control",
            Stage::ActionsObjectives => "Actions on Objectives",
        }
    }

    /// Abbreviated label used in compact displays.
    pub fn short(self) -> &'static str {
        match self {
            Stage::Reconnaissance => "RECON",
            Stage::Weaponization => "WEAPON",
            Stage::Delivery => "DELIVERY",
            Stage::Exploitation => "EXPLOIT",
            Stage::Installation => "INSTALL",
            Stage::CommandControl => "C2",
            Stage::ActionsObjectives => "ACTIONS",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Maps a MITRE tactic label to the highest kill-chain stage it activates.
///
/// Matching is case-insensitive substring containment against tactic codes
/// and names. Labels that match nothing infer [`Stage::Reconnaissance`].
pub fn stage_for_tactic(tactic: &str) -> Stage {
    let t = tactic.to_lowercase();

    if t.contains("ta0040")
        || t.contains("impact")
        || t.contains("ta0010")
        || t.contains("exfiltration")
        || t.contains("ta0009")
        || t.contains("collection")
        || t.contains("ta0006")
        || t.contains("credential")
    {
        return Stage::ActionsObjectives;
    }
    if t.contains("ta0011") || t.contains("command") || t.contains("c2") || t.contains("control") {
        return Stage::CommandControl;
    }
    if t.contains("ta0003") || t.contains("persistence") || t.contains("installation") {
        return Stage::Installation;
    }
    if t.contains("ta0002") || t.contains("execution") || t.contains("ta0004") || t.contains("privilege")
    {
        return Stage::Exploitation;
    }
    if t.contains("ta0001") || t.contains("initial") || t.contains("delivery") {
        return Stage::Delivery;
    }
    if t.contains("ta0042") || t.contains("resource") || t.contains("weaponization") {
        return Stage::Weaponization;
    }
    Stage::Reconnaissance
}

/// Highest stage activated by any of the given tactic labels.
///
/// An empty set infers stage 0.
pub fn active_stage<'a>(tactics: impl IntoIterator<Item = &'a str>) -> Stage {
    tactics
        .into_iter()
        .map(stage_for_tactic)
        .max()
        .unwrap_or(Stage::Reconnaissance)
}

/// Highest stage activated across the tactics of all Active and Monitoring
/// campaigns. Resolved and false-positive campaigns do not contribute.
pub fn active_stage_for_campaigns(campaigns: &[Campaign]) -> Stage {
    active_stage(
        campaigns
            .iter()
            .filter(|c| {
                matches!(c.status, CampaignStatus::Active | CampaignStatus::Monitoring)
            })
            .flat_map(|c| c.mitre_tactics.iter().map(String::as_str)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_campaign;

    #[test]
    fn test_command_and_control_tactic() {
        let chain = KillChain::from_tactic("TA0011 - Command and Control");
        assert!(chain.command_control);
        assert!(!chain.reconnaissance);
        assert!(!chain.weaponization);
        assert!(!chain.delivery);
        assert!(!chain.exploitation);
        assert!(!chain.installation);
        assert!(!chain.actions_objectives);
    }

    #[test]
    fn test_initial_access_sets_two_flags() {
        let chain = KillChain::from_tactic("TA0001 - Initial Access");
        assert!(chain.delivery);
        assert!(chain.exploitation);
        assert!(!chain.installation);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let once = KillChain::from_tactic("TA0003 - Persistence");
        let twice = once.merge(KillChain::from_tactic("TA0003 - Persistence"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_tactic_is_identity() {
        let chain = KillChain::from_tactic("TA9999 - Interpretive Dance");
        assert!(chain.is_empty());
    }

    #[test]
    fn test_merge_never_clears() {
        let a = KillChain::from_tactic("TA0003 - Persistence");
        let merged = a.merge(KillChain::default());
        assert!(merged.installation);
    }

    #[test]
    fn test_fold_multiple_tactics() {
        let chain = KillChain::from_tactics([
            "TA0001 - Initial Access",
            "TA0011 - Command and Control",
            "TA0040 - Impact",
        ]);
        assert!(chain.delivery);
        assert!(chain.exploitation);
        assert!(chain.command_control);
        assert!(chain.actions_objectives);
        assert!(!chain.installation);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let chain = KillChain::from_tactic("CREDENTIAL ACCESS");
        assert!(chain.exploitation);
    }

    #[test]
    fn test_stage_for_tactic_codes() {
        assert_eq!(stage_for_tactic("TA0043 - Reconnaissance"), Stage::Reconnaissance);
        assert_eq!(stage_for_tactic("TA0042 - Resource Development"), Stage::Weaponization);
        assert_eq!(stage_for_tactic("TA0001 - Initial Access"), Stage::Delivery);
        assert_eq!(stage_for_tactic("TA0004 - Privilege Escalation"), Stage::Exploitation);
        assert_eq!(stage_for_tactic("TA0003 - Persistence"), Stage::Installation);
        assert_eq!(stage_for_tactic("TA0011 - Command and Control"), Stage::CommandControl);
        assert_eq!(stage_for_tactic("TA0006 - Credential Access"), Stage::ActionsObjectives);
        assert_eq!(stage_for_tactic("TA0010 - Exfiltration"), Stage::ActionsObjectives);
    }

    #[test]
    fn test_stage_precedence_within_one_label() {
        // "Command and Control" also contains no higher-stage keyword, but a
        // label matching several tables must resolve to the highest stage.
        assert_eq!(stage_for_tactic("command and control with impact"), Stage::ActionsObjectives);
    }

    #[test]
    fn test_active_stage_takes_maximum() {
        let stage = active_stage(["TA0001 - Initial Access", "TA0011 - Command and Control"]);
        assert_eq!(stage, Stage::CommandControl);
    }

    #[test]
    fn test_active_stage_empty_defaults_to_zero() {
        assert_eq!(active_stage([]), Stage::Reconnaissance);
        assert_eq!(active_stage([]).index(), 0);
    }

    #[test]
    fn test_campaign_stage_skips_resolved() {
        let mut active = sample_campaign("CMP-0001");
        active.status = CampaignStatus::Active;
        active.mitre_tactics = vec!["TA0002 - Execution".to_string()];

        let mut resolved = sample_campaign("CMP-0002");
        resolved.status = CampaignStatus::Resolved;
        resolved.mitre_tactics = vec!["TA0040 - Impact".to_string()];

        let stage = active_stage_for_campaigns(&[active, resolved]);
        assert_eq!(stage, Stage::Exploitation);
    }

    #[test]
    fn test_no_active_campaigns_defaults_to_zero() {
        let mut resolved = sample_campaign("CMP-0003");
        resolved.status = CampaignStatus::Resolved;
        assert_eq!(active_stage_for_campaigns(&[resolved]).index(), 0);
    }
}
