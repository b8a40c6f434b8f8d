//! Attack graph synthesis.
//!
//! Builds the small directed entity graph rendered on the L2 investigation
//! panel: user, host, source IP, and MITRE technique nodes, with labeled
//! relations rooted at the host.

use crate::alert::Alert;
use serde::{Deserialize, Serialize};

/// Kind of entity a graph node represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    User,
    Host,
    InternalIp,
    ExternalIp,
    Technique,
}

/// A node in the attack graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    /// Stable node id within the graph.
    pub id: String,
    /// Display label (username, hostname, IP, or technique).
    pub label: String,
    /// Entity kind.
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// A labeled directed edge between two graph nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Label applied to the source-IP -> host edge when VirusTotal reports
/// neither malicious nor suspicious verdicts (or no lookup exists).
///
/// The two call sites in the original front-end disagreed on this default;
/// it is an explicit configuration here rather than a silent choice.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionLabel {
    /// Plain "connection".
    #[default]
    Connection,
    /// "suspicious_connection" even without a VirusTotal verdict.
    SuspiciousConnection,
}

impl ConnectionLabel {
    fn as_str(self) -> &'static str {
        match self {
            ConnectionLabel::Connection => "connection",
            ConnectionLabel::SuspiciousConnection => "suspicious_connection",
        }
    }
}

/// Options controlling graph synthesis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphOptions {
    /// Default source-IP connection label (see [`ConnectionLabel`]).
    #[serde(default)]
    pub default_connection_label: ConnectionLabel,
}

/// The attack graph embedded in an incident.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttackGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl AttackGraph {
    /// Synthesizes the attack graph for an alert.
    ///
    /// Node emission order is fixed: user, host, source IP, technique; each
    /// is emitted only when the corresponding alert field is present. Edges
    /// require both endpoints:
    ///
    /// - user -> host: `accessed`
    /// - source IP -> host: `malicious_connection` when VirusTotal reports
    ///   malicious verdicts, `suspicious_connection` when only suspicious
    ///   verdicts, otherwise the configured default label
    /// - technique -> host: `attack_pattern`
    ///
    /// The source IP is classified internal when it falls in the 10.,
    /// 172.16., or 192.168. prefix ranges.
    pub fn from_alert(alert: &Alert, options: &GraphOptions) -> Self {
        let mut graph = Self::default();

        let has_user = !alert.user.is_empty();
        let has_host = !alert.host.is_empty();

        if has_user {
            graph.nodes.push(GraphNode {
                id: "user1".to_string(),
                label: alert.user.clone(),
                kind: NodeKind::User,
            });
        }

        if has_host {
            graph.nodes.push(GraphNode {
                id: "host1".to_string(),
                label: alert.host.clone(),
                kind: NodeKind::Host,
            });
            if has_user {
                graph.edges.push(GraphEdge {
                    from: "user1".to_string(),
                    to: "host1".to_string(),
                    label: "accessed".to_string(),
                });
            }
        }

        if !alert.src_ip.is_empty() {
            let kind = if is_private_ip(&alert.src_ip) {
                NodeKind::InternalIp
            } else {
                NodeKind::ExternalIp
            };
            graph.nodes.push(GraphNode {
                id: "source_ip".to_string(),
                label: alert.src_ip.clone(),
                kind,
            });

            if has_host {
                let label = connection_label(alert, options);
                graph.edges.push(GraphEdge {
                    from: "source_ip".to_string(),
                    to: "host1".to_string(),
                    label: label.to_string(),
                });
            }
        }

        if let Some(mitre) = &alert.mitre_attack {
            graph.nodes.push(GraphNode {
                id: "technique".to_string(),
                label: format!("{}: {}", mitre.id, mitre.name),
                kind: NodeKind::Technique,
            });
            if has_host {
                graph.edges.push(GraphEdge {
                    from: "technique".to_string(),
                    to: "host1".to_string(),
                    label: "attack_pattern".to_string(),
                });
            }
        }

        graph
    }
}

fn connection_label(alert: &Alert, options: &GraphOptions) -> &'static str {
    match &alert.virustotal_data {
        Some(vt) if vt.malicious > 0 => "malicious_connection",
        Some(vt) if vt.suspicious > 0 => "suspicious_connection",
        _ => options.default_connection_label.as_str(),
    }
}

/// RFC 1918 prefix check as performed by the original front-end: 10.,
/// 172.16., and 192.168. only (the broader 172.17-31 ranges are not
/// considered internal).
fn is_private_ip(ip: &str) -> bool {
    ip.starts_with("10.") || ip.starts_with("172.16.") || ip.starts_with("192.168.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_alert;

    #[test]
    fn test_full_graph_shape() {
        let alert = sample_alert("ALT-000001");
        let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["user1", "host1", "source_ip", "technique"]);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.edges[0].label, "accessed");
        assert_eq!(graph.edges[2].label, "attack_pattern");
    }

    #[test]
    fn test_malicious_connection_label() {
        let mut alert = sample_alert("ALT-000001");
        alert.virustotal_data.as_mut().unwrap().malicious = 12;
        let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());
        assert_eq!(graph.edges[1].label, "malicious_connection");
    }

    #[test]
    fn test_suspicious_connection_label() {
        let mut alert = sample_alert("ALT-000001");
        {
            let vt = alert.virustotal_data.as_mut().unwrap();
            vt.malicious = 0;
            vt.suspicious = 3;
        }
        let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());
        assert_eq!(graph.edges[1].label, "suspicious_connection");
    }

    #[test]
    fn test_default_label_is_configurable() {
        let mut alert = sample_alert("ALT-000001");
        {
            let vt = alert.virustotal_data.as_mut().unwrap();
            vt.malicious = 0;
            vt.suspicious = 0;
        }

        let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());
        assert_eq!(graph.edges[1].label, "connection");

        let options = GraphOptions {
            default_connection_label: ConnectionLabel::SuspiciousConnection,
        };
        let graph = AttackGraph::from_alert(&alert, &options);
        assert_eq!(graph.edges[1].label, "suspicious_connection");
    }

    #[test]
    fn test_missing_vt_uses_default_label() {
        let mut alert = sample_alert("ALT-000001");
        alert.virustotal_data = None;
        let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());
        assert_eq!(graph.edges[1].label, "connection");
    }

    #[test]
    fn test_internal_ip_classification() {
        for (ip, internal) in [
            ("10.0.0.45", true),
            ("172.16.50.23", true),
            ("192.168.1.100", true),
            ("172.17.0.1", false),
            ("45.142.120.10", false),
        ] {
            let mut alert = sample_alert("ALT-000001");
            alert.src_ip = ip.to_string();
            let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());
            let node = graph.nodes.iter().find(|n| n.id == "source_ip").unwrap();
            let expected = if internal {
                NodeKind::InternalIp
            } else {
                NodeKind::ExternalIp
            };
            assert_eq!(node.kind, expected, "ip {ip}");
        }
    }

    #[test]
    fn test_no_host_means_no_edges() {
        let mut alert = sample_alert("ALT-000001");
        alert.host = String::new();
        let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());
        assert!(graph.edges.is_empty());
        assert_eq!(graph.nodes.len(), 3);
    }

    #[test]
    fn test_no_technique_node_without_mitre() {
        let mut alert = sample_alert("ALT-000001");
        alert.mitre_attack = None;
        let graph = AttackGraph::from_alert(&alert, &GraphOptions::default());
        assert!(graph.nodes.iter().all(|n| n.kind != NodeKind::Technique));
        assert_eq!(graph.edges.len(), 2);
    }
}
