//! CyberScope CLI
//!
//! Command-line interface for the CyberScope tiered triage workflow: feed
//! ingestion, alert review, tier escalation, kill-chain analytics, and
//! analyst session management.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod config;

use config::AppConfig;
use cs_core::analytics;
use cs_core::feed::load_feed;
use cs_core::killchain::active_stage_for_campaigns;
use cs_core::session::{default_roster, FileBackend, Session};
use cs_core::store::TriageStore;
use cs_core::{Alert, Severity};
use cs_observability::{AuditEventType, AuditLog, AuditResult};

#[derive(Parser)]
#[command(name = "cyberscope")]
#[command(version)]
#[command(about = "Tiered SOC triage: alerts, incidents, and threat campaigns", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Threat-intelligence feed file (overrides the configured path)
    #[arg(long, value_name = "FILE")]
    feed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Load the threat-intelligence feed and summarize the alert queue
    Ingest {
        /// Base instant for alert timestamps (RFC 3339); defaults to now
        #[arg(long, value_name = "TIMESTAMP")]
        base_time: Option<String>,
    },

    /// List alerts in the L1 queue
    Alerts {
        /// Filter by severity (low, medium, high, critical)
        #[arg(short, long)]
        severity: Option<String>,

        /// Maximum number of alerts to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Escalate an alert to an incident (and optionally on to a campaign)
    Escalate {
        /// Alert ID (ALT-nnnnnn)
        alert_id: String,

        /// Escalation note
        #[arg(short, long, default_value = "")]
        note: String,

        /// Escalate the resulting incident straight to a campaign
        #[arg(long)]
        to_campaign: bool,
    },

    /// Show the kill-chain phase breakdown of the alert queue
    Killchain,

    /// Manage the analyst session
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand, Clone)]
enum UserCommands {
    /// List the SOC roster
    List,

    /// Show the active analyst
    Current,

    /// Switch the active analyst
    Switch {
        /// Analyst roster id
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config/cyberscope.yaml"));
    let config = AppConfig::load(&config_path).unwrap_or_else(|_| {
        if cli.verbose {
            eprintln!("Using default configuration (no config file found)");
        }
        AppConfig::default()
    });

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        parse_level(&config.logging.level)
    };

    cs_observability::init_logging_with_config(cs_observability::LoggingConfig {
        level: log_level,
        json_format: config.logging.json_format || cli.format == OutputFormat::Json,
        ..Default::default()
    });

    let audit = AuditLog::default();

    match cli.command.clone() {
        Commands::Ingest { base_time } => cmd_ingest(&cli, &config, base_time, &audit),
        Commands::Alerts { severity, limit } => cmd_alerts(&cli, &config, severity, limit),
        Commands::Escalate {
            alert_id,
            note,
            to_campaign,
        } => cmd_escalate(&cli, &config, &alert_id, &note, to_campaign, &audit),
        Commands::Killchain => cmd_killchain(&cli, &config),
        Commands::User { action } => cmd_user(&cli, &config, action, &audit),
        Commands::Config => cmd_config(&config, cli.format),
    }
}

fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

fn parse_severity(s: &str) -> Result<Severity> {
    match s.to_lowercase().as_str() {
        "low" => Ok(Severity::Low),
        "medium" => Ok(Severity::Medium),
        "high" => Ok(Severity::High),
        "critical" => Ok(Severity::Critical),
        _ => bail!("Invalid severity: {}", s),
    }
}

fn feed_path(cli: &Cli, config: &AppConfig) -> PathBuf {
    cli.feed
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.feed.path))
}

fn load_alerts(cli: &Cli, config: &AppConfig, base_time: DateTime<Utc>) -> Result<Vec<Alert>> {
    let path = feed_path(cli, config);
    load_feed(&path, base_time).with_context(|| format!("Failed to load feed: {}", path.display()))
}

fn load_store(cli: &Cli, config: &AppConfig) -> Result<TriageStore> {
    let alerts = load_alerts(cli, config, Utc::now())?;
    Ok(TriageStore::new(
        alerts,
        Vec::new(),
        Vec::new(),
        config.graph.options(),
    ))
}

fn open_session(config: &AppConfig) -> Result<Session<FileBackend>> {
    let backend = FileBackend::new(&config.session.state_path);
    Ok(Session::open(default_roster(), backend)?)
}

fn severity_colored(severity: Severity) -> colored::ColoredString {
    let label = severity.to_string();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.yellow(),
        Severity::Medium => label.cyan(),
        Severity::Low => label.white(),
    }
}

fn cmd_ingest(
    cli: &Cli,
    config: &AppConfig,
    base_time: Option<String>,
    audit: &AuditLog,
) -> Result<()> {
    let base_time = match base_time {
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .with_context(|| format!("Invalid base time: {}", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let alerts = load_alerts(cli, config, base_time)?;
    audit.log_event(
        AuditEventType::DatasetLoaded,
        "system",
        &format!("Loaded {} alerts from feed", alerts.len()),
        AuditResult::Success,
    );

    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    println!("{}", "Feed Ingested".bold());
    println!("─────────────");
    println!("Alerts: {}", alerts.len());

    for severity in [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ] {
        let count = alerts.iter().filter(|a| a.severity == severity).count();
        println!("  {}: {}", severity_colored(severity), count);
    }

    let open = alerts
        .iter()
        .filter(|a| a.status == cs_core::AlertStatus::Open)
        .count();
    println!("Open: {} | Ignored: {}", open, alerts.len() - open);

    Ok(())
}

fn cmd_alerts(
    cli: &Cli,
    config: &AppConfig,
    severity: Option<String>,
    limit: usize,
) -> Result<()> {
    let severity = severity.as_deref().map(parse_severity).transpose()?;
    let store = load_store(cli, config)?;

    let alerts: Vec<&Alert> = store
        .alerts()
        .iter()
        .filter(|a| severity.map_or(true, |s| a.severity == s))
        .take(limit)
        .collect();

    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    println!("{}", "L1 Alert Queue".bold());
    println!("──────────────");
    if alerts.is_empty() {
        println!("No alerts found");
        return Ok(());
    }
    for alert in alerts {
        println!(
            "  {} [{}] {} {} - {}",
            alert.alert_id.cyan(),
            severity_colored(alert.severity),
            alert.source,
            alert.status,
            alert.title
        );
    }

    Ok(())
}

fn cmd_escalate(
    cli: &Cli,
    config: &AppConfig,
    alert_id: &str,
    note: &str,
    to_campaign: bool,
    audit: &AuditLog,
) -> Result<()> {
    let session = open_session(config)?;
    let analyst = session.current().full_name.clone();
    let mut store = load_store(cli, config)?;

    let incident_id = match store.escalate_alert(alert_id, note, &[], &analyst) {
        Ok(id) => id,
        Err(err) => {
            audit.log_entity_event(
                AuditEventType::AlertEscalated,
                &analyst,
                alert_id,
                "Escalation rejected",
                serde_json::json!({}),
                AuditResult::Failure(err.to_string()),
            );
            return Err(err.into());
        }
    };

    audit.log_entity_event(
        AuditEventType::AlertEscalated,
        &analyst,
        alert_id,
        "Alert escalated to incident",
        serde_json::json!({ "incident_id": incident_id }),
        AuditResult::Success,
    );

    let campaign_id = if to_campaign {
        let id = store.escalate_incident(&incident_id, note, &[], &analyst)?;
        audit.log_entity_event(
            AuditEventType::IncidentEscalated,
            &analyst,
            &incident_id,
            "Incident escalated to campaign",
            serde_json::json!({ "campaign_id": id }),
            AuditResult::Success,
        );
        Some(id)
    } else {
        None
    };

    if cli.format == OutputFormat::Json {
        let output = match &campaign_id {
            Some(id) => serde_json::to_value(store.find_campaign(id))?,
            None => serde_json::to_value(store.find_incident(&incident_id))?,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Escalation Complete".bold());
    println!("───────────────────");
    println!("Alert:    {}", alert_id.cyan());
    println!("Incident: {}", incident_id.cyan());

    match campaign_id {
        Some(id) => {
            let campaign = store
                .find_campaign(&id)
                .context("campaign vanished after escalation")?;
            println!("Campaign: {}", id.cyan());
            println!("Tactics:  {}", campaign.mitre_tactics.join(", "));
            if let Some(analysis) = &campaign.threat_analysis {
                println!();
                println!("{}", "Threat Analysis".bold());
                println!(
                    "  {} {} ({})",
                    analysis.technique_id.cyan(),
                    analysis.technique_name,
                    analysis.threat_impact
                );
                println!("  Confidence: {}%", analysis.ai_confidence);
                println!("  Escalation probability: {}%", analysis.attack_probability_score);
                println!("  Action: {}", analysis.recommended_action);
            }
        }
        None => {
            let incident = store
                .find_incident(&incident_id)
                .context("incident vanished after escalation")?;
            println!("Title:    {}", incident.title);
            println!("Severity: {}", severity_colored(incident.severity));
            let active: Vec<&str> = [
                ("reconnaissance", incident.kill_chain.reconnaissance),
                ("weaponization", incident.kill_chain.weaponization),
                ("delivery", incident.kill_chain.delivery),
                ("exploitation", incident.kill_chain.exploitation),
                ("installation", incident.kill_chain.installation),
                ("command & control", incident.kill_chain.command_control),
                ("actions on objectives", incident.kill_chain.actions_objectives),
            ]
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
            println!(
                "Kill chain: {}",
                if active.is_empty() {
                    "none".to_string()
                } else {
                    active.join(", ")
                }
            );
        }
    }

    Ok(())
}

fn cmd_killchain(cli: &Cli, config: &AppConfig) -> Result<()> {
    let store = load_store(cli, config)?;
    let buckets = analytics::alert_phase_breakdown(store.alerts());
    let campaign_stage = active_stage_for_campaigns(store.campaigns());

    if cli.format == OutputFormat::Json {
        let output: Vec<serde_json::Value> = buckets
            .iter()
            .map(|b| {
                serde_json::json!({
                    "stage": b.stage.index(),
                    "name": b.stage.name(),
                    "count": b.count,
                    "critical": b.severity.critical,
                    "high": b.severity.high,
                    "medium": b.severity.medium,
                    "low": b.severity.low,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Cyber Kill Chain".bold());
    println!("────────────────");
    let active = analytics::highest_populated_stage(&buckets);
    for bucket in &buckets {
        let marker = if bucket.stage == active { ">" } else { " " };
        let name = if bucket.stage == active {
            bucket.stage.name().bold()
        } else {
            bucket.stage.name().normal()
        };
        println!(
            "{} {} [{}] - {} alerts (C:{} H:{} M:{} L:{})",
            marker,
            name,
            bucket.stage.short(),
            bucket.count,
            bucket.severity.critical,
            bucket.severity.high,
            bucket.severity.medium,
            bucket.severity.low,
        );
    }
    println!();
    println!("Campaign stage: {}", campaign_stage.name());

    Ok(())
}

fn cmd_user(cli: &Cli, config: &AppConfig, action: UserCommands, audit: &AuditLog) -> Result<()> {
    let mut session = open_session(config)?;

    match action {
        UserCommands::List => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(session.roster())?);
                return Ok(());
            }
            println!("{}", "SOC Roster".bold());
            println!("──────────");
            for analyst in session.roster() {
                let marker = if analyst.id == session.current().id {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {} {} ({}) - {}",
                    marker,
                    analyst.id.cyan(),
                    analyst.full_name,
                    analyst.role,
                    analyst.email
                );
            }
        }
        UserCommands::Current => {
            let analyst = session.current();
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(analyst)?);
                return Ok(());
            }
            println!("{} ({})", analyst.full_name.bold(), analyst.role);
        }
        UserCommands::Switch { id } => {
            let analyst = session.switch(&id)?;
            audit.log_event(
                AuditEventType::AnalystSwitched,
                &analyst.id.clone(),
                &format!("Active analyst is now {}", analyst.full_name),
                AuditResult::Success,
            );
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(analyst)?);
                return Ok(());
            }
            println!(
                "Switched to {} ({})",
                analyst.full_name.green(),
                analyst.role
            );
        }
    }

    Ok(())
}

fn cmd_config(config: &AppConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("{}", "Current Configuration".bold());
    println!("─────────────────────");
    println!("Feed path:     {}", config.feed.path);
    println!("Session state: {}", config.session.state_path);
    println!(
        "Graph default: {:?}",
        config.graph.default_connection_label
    );
    println!(
        "Logging:       {} (json: {})",
        config.logging.level, config.logging.json_format
    );

    Ok(())
}
