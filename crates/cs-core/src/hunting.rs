//! Threat-hunting analysis generation for L3 campaigns.
//!
//! A deterministic intelligence profile is derived from a campaign's leading
//! MITRE tactic, risk level, and status: the tactic selects a technique
//! profile from a fixed knowledge table, the risk level sets the confidence
//! score, and the status/risk pair sets the escalation probability.

use crate::alert::Severity;
use crate::campaign::{Campaign, CampaignStatus, ThreatHuntingAnalysis};

/// Static knowledge entry for one MITRE tactic.
struct TacticProfile {
    code: &'static str,
    technique_id: &'static str,
    technique_name: &'static str,
    impact: &'static str,
    description: &'static str,
    detection: &'static [&'static str],
    ttp_next: &'static [&'static str],
    indicators: &'static [&'static str],
}

const TACTIC_PROFILES: &[TacticProfile] = &[
    TacticProfile {
        code: "TA0001",
        technique_id: "T1566.001",
        technique_name: "Spearphishing Attachment",
        impact: "Initial Access",
        description: "Adversaries send spearphishing emails with malicious attachments to gain initial access.",
        detection: &[
            "Monitor email gateway for suspicious attachments",
            "Analyze email headers for spoofing indicators",
            "Sandboxing of email attachments",
            "User-reported phishing analysis",
        ],
        ttp_next: &[
            "T1204.002 - User Execution: Malicious File",
            "T1059.001 - PowerShell execution",
            "T1547.001 - Registry Run Keys for persistence",
        ],
        indicators: &[
            "Emails from recently registered domains",
            "Attachments with double extensions",
            "Macro-enabled documents from external sources",
        ],
    },
    TacticProfile {
        code: "TA0002",
        technique_id: "T1059.001",
        technique_name: "PowerShell",
        impact: "Execution",
        description: "Adversaries abuse PowerShell to execute commands and scripts.",
        detection: &[
            "PowerShell logging and monitoring",
            "Script block logging analysis",
            "Behavioral detection of obfuscated commands",
            "Parent-child process relationship monitoring",
        ],
        ttp_next: &[
            "T1003.001 - LSASS Memory dumping",
            "T1059.003 - Windows Command Shell",
            "T1071.001 - C2 over web protocols",
        ],
        indicators: &[
            "Base64-encoded PowerShell commands",
            "Download cradles (IEX, Invoke-WebRequest)",
            "Uncommon parent processes spawning PowerShell",
        ],
    },
    TacticProfile {
        code: "TA0003",
        technique_id: "T1547.001",
        technique_name: "Registry Run Keys / Startup Folder",
        impact: "Persistence",
        description: "Adversaries achieve persistence by adding programs to startup locations.",
        detection: &[
            "Monitor registry key modifications",
            "Baseline startup folder contents",
            "Alert on new autoruns entries",
            "Sysmon Event ID 13 monitoring",
        ],
        ttp_next: &[
            "T1055 - Process Injection",
            "T1543.003 - Windows Service creation",
            "T1053.005 - Scheduled Task persistence",
        ],
        indicators: &[
            "Modifications to Run/RunOnce registry keys",
            "New files in startup folders",
            "Suspicious scheduled tasks",
        ],
    },
    TacticProfile {
        code: "TA0004",
        technique_id: "T1068",
        technique_name: "Exploitation for Privilege Escalation",
        impact: "Privilege Escalation",
        description: "Adversaries exploit software vulnerabilities to elevate privileges.",
        detection: &[
            "Monitor for unexpected privilege changes",
            "Vulnerability scanning and patching",
            "User Account Control (UAC) bypass detection",
            "Kernel exploit detection via endpoint monitoring",
        ],
        ttp_next: &[
            "T1003.001 - Credential Dumping",
            "T1078.003 - Local Accounts abuse",
            "T1136 - Create Account for persistence",
        ],
        indicators: &[
            "Processes running with unexpected privileges",
            "Known CVE exploitation attempts",
            "Modifications to access tokens",
        ],
    },
    TacticProfile {
        code: "TA0006",
        technique_id: "T1003.001",
        technique_name: "LSASS Memory",
        impact: "Credential Access",
        description: "Adversaries access LSASS process memory to obtain credentials.",
        detection: &[
            "Monitor LSASS process access",
            "Detect credential dumping tools (Mimikatz)",
            "Alert on suspicious process injection",
            "EDR behavioral detection",
        ],
        ttp_next: &[
            "T1021.002 - SMB/Windows Admin Shares lateral movement",
            "T1550.002 - Pass the Hash",
            "T1078 - Valid Accounts usage",
        ],
        indicators: &[
            "Suspicious LSASS process access",
            "Known credential dumping tool signatures",
            "LSASS memory dumps",
        ],
    },
    TacticProfile {
        code: "TA0008",
        technique_id: "T1021.002",
        technique_name: "SMB/Windows Admin Shares",
        impact: "Lateral Movement",
        description: "Adversaries use SMB to move laterally across network.",
        detection: &[
            "Monitor SMB traffic patterns",
            "Detect admin share enumeration",
            "Alert on unusual logon patterns",
            "Track remote service creation",
        ],
        ttp_next: &[
            "T1569.002 - Service Execution",
            "T1053.005 - Scheduled Task on remote systems",
            "T1047 - WMI for remote execution",
        ],
        indicators: &[
            "ADMIN$ share access from unusual hosts",
            "Spike in SMB connections",
            "Service installations on multiple hosts",
        ],
    },
    TacticProfile {
        code: "TA0009",
        technique_id: "T1005",
        technique_name: "Data from Local System",
        impact: "Collection",
        description: "Adversaries search and collect data from local system sources.",
        detection: &[
            "File access monitoring",
            "Detect mass file reading operations",
            "Monitor for archiving tools",
            "Track sensitive file access",
        ],
        ttp_next: &[
            "T1560.001 - Archive via utility",
            "T1041 - Exfiltration Over C2 Channel",
            "T1071.001 - Web-based exfiltration",
        ],
        indicators: &[
            "Access to sensitive directories",
            "Use of archiving utilities (7zip, WinRAR)",
            "Large file operations",
        ],
    },
    TacticProfile {
        code: "TA0011",
        technique_id: "T1071.001",
        technique_name: "Web Protocols",
        impact: "Command and Control",
        description: "Adversaries use web protocols for C2 communications.",
        detection: &[
            "SSL/TLS inspection",
            "Detect beaconing behavior",
            "Monitor for C2 domain IOCs",
            "Analyze HTTP/HTTPS traffic patterns",
        ],
        ttp_next: &[
            "T1041 - Exfiltration Over C2",
            "T1105 - Ingress Tool Transfer",
            "T1219 - Remote Access Software",
        ],
        indicators: &[
            "Regular beaconing to external IPs",
            "Communication with known malicious domains",
            "Unusual user-agent strings",
        ],
    },
    TacticProfile {
        code: "TA0040",
        technique_id: "T1486",
        technique_name: "Data Encrypted for Impact",
        impact: "Impact",
        description: "Adversaries encrypt data to disrupt availability and/or extort payment.",
        detection: &[
            "Monitor for mass file encryption",
            "Detect ransomware signatures",
            "Alert on unusual file extension changes",
            "Behavioral ransomware detection",
        ],
        ttp_next: &[
            "T1491 - Defacement",
            "T1490 - Inhibit System Recovery",
            "T1489 - Service Stop of backups",
        ],
        indicators: &[
            "Rapid file modifications across system",
            "Ransom notes (README.txt, HOW_TO_DECRYPT)",
            "Known ransomware file extensions",
        ],
    },
];

/// Profile lookup by the 6-character tactic code prefix of the campaign's
/// first tactic label. Unknown or absent tactics fall back to Initial
/// Access.
fn profile_for(campaign: &Campaign) -> &'static TacticProfile {
    let first_tactic = campaign
        .mitre_tactics
        .first()
        .map(String::as_str)
        .unwrap_or("TA0001 - Initial Access");
    let code: String = first_tactic.chars().take(6).collect();
    TACTIC_PROFILES
        .iter()
        .find(|p| p.code == code)
        .unwrap_or(&TACTIC_PROFILES[0])
}

fn confidence_for(risk: Severity) -> u8 {
    match risk {
        Severity::Critical => 95,
        Severity::High => 85,
        Severity::Medium => 70,
        Severity::Low => 55,
    }
}

fn probability_for(status: CampaignStatus, risk: Severity) -> u8 {
    match status {
        CampaignStatus::Active => {
            if risk == Severity::Critical {
                92
            } else {
                78
            }
        }
        CampaignStatus::Monitoring => 55,
        CampaignStatus::Resolved | CampaignStatus::FalsePositive => 25,
    }
}

/// Generates the threat-hunting analysis for a campaign.
///
/// The same campaign always yields the same analysis.
pub fn generate_threat_analysis(campaign: &Campaign) -> ThreatHuntingAnalysis {
    let profile = profile_for(campaign);
    let recommended_action = if campaign.status == CampaignStatus::Active {
        format!(
            "Immediate threat - Deploy enhanced monitoring for {}. Isolate affected systems and hunt for IOCs across environment.",
            profile.technique_name
        )
    } else {
        format!(
            "Monitor for escalation indicators. Review logs for {} patterns. Update detection rules.",
            profile.technique_name
        )
    };

    ThreatHuntingAnalysis {
        technique_id: profile.technique_id.to_string(),
        technique_name: profile.technique_name.to_string(),
        threat_impact: profile.impact.to_string(),
        ai_confidence: confidence_for(campaign.risk_level),
        technique_description: profile.description.to_string(),
        detection_strategies: profile.detection.iter().map(|s| s.to_string()).collect(),
        ttp_prediction: profile.ttp_next.iter().map(|s| s.to_string()).collect(),
        attack_probability_score: probability_for(campaign.status, campaign.risk_level),
        early_indicators: profile.indicators.iter().map(|s| s.to_string()).collect(),
        recommended_action,
    }
}
