//! Analyst session management.
//!
//! The SOC roster is fixed: eight analysts, two per role. A [`Session`]
//! tracks which analyst is active and persists only that id through a
//! [`SessionBackend`]; a missing or unknown persisted id resolves to the
//! first roster entry.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// SOC role of an analyst.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// SOC lead, access to every tier
    Lead,
    /// L1 alert triage
    L1,
    /// L2 incident investigation
    L2,
    /// L3 threat hunting
    L3,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Lead => write!(f, "SOC Lead"),
            Role::L1 => write!(f, "SOC L1"),
            Role::L2 => write!(f, "SOC L2"),
            Role::L3 => write!(f, "SOC L3"),
        }
    }
}

/// One analyst on the SOC roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Analyst {
    /// Roster id.
    pub id: String,
    /// Full name.
    pub full_name: String,
    /// Work email.
    pub email: String,
    /// SOC role.
    pub role: Role,
}

/// The default eight-analyst roster, two per role, leads first.
pub fn default_roster() -> Vec<Analyst> {
    let entries = [
        ("1", "Dana Whitfield", "dana.whitfield@cyberscope.example", Role::Lead),
        ("2", "Marcus Oyelaran", "marcus.oyelaran@cyberscope.example", Role::Lead),
        ("3", "Priya Raghunathan", "priya.raghunathan@cyberscope.example", Role::L1),
        ("4", "Tomas Lindqvist", "tomas.lindqvist@cyberscope.example", Role::L1),
        ("5", "Amira Haddad", "amira.haddad@cyberscope.example", Role::L2),
        ("6", "Felix Arnaud", "felix.arnaud@cyberscope.example", Role::L2),
        ("7", "Keiko Matsuda", "keiko.matsuda@cyberscope.example", Role::L3),
        ("8", "Ruben Castillo", "ruben.castillo@cyberscope.example", Role::L3),
    ];
    entries
        .into_iter()
        .map(|(id, full_name, email, role)| Analyst {
            id: id.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            role,
        })
        .collect()
}

/// Errors produced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested analyst id is not on the roster.
    #[error("analyst {0} not on roster")]
    UnknownAnalyst(String),
    /// The roster is empty.
    #[error("empty analyst roster")]
    EmptyRoster,
    /// Persisting or loading the session state failed.
    #[error("session state error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence for the active analyst id.
pub trait SessionBackend {
    /// Loads the persisted analyst id, if any.
    fn load(&self) -> Result<Option<String>, SessionError>;
    /// Persists the active analyst id.
    fn store(&mut self, analyst_id: &str) -> Result<(), SessionError>;
}

/// File-backed session state: the analyst id as a single line.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionBackend for FileBackend {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(id.to_string()))
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&mut self, analyst_id: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(&self.path)?;
        writeln!(file, "{analyst_id}")?;
        Ok(())
    }
}

/// In-memory session state, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    analyst_id: Option<String>,
}

impl SessionBackend for InMemoryBackend {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.analyst_id.clone())
    }

    fn store(&mut self, analyst_id: &str) -> Result<(), SessionError> {
        self.analyst_id = Some(analyst_id.to_string());
        Ok(())
    }
}

/// The active-analyst session.
pub struct Session<B: SessionBackend> {
    roster: Vec<Analyst>,
    current: usize,
    backend: B,
}

impl<B: SessionBackend> Session<B> {
    /// Opens a session over the given roster and backend.
    ///
    /// A persisted id that resolves to a roster entry selects that analyst;
    /// anything else falls back to the first entry.
    pub fn open(roster: Vec<Analyst>, backend: B) -> Result<Self, SessionError> {
        if roster.is_empty() {
            return Err(SessionError::EmptyRoster);
        }
        let current = match backend.load()? {
            Some(id) => roster.iter().position(|a| a.id == id).unwrap_or(0),
            None => 0,
        };
        Ok(Self {
            roster,
            current,
            backend,
        })
    }

    /// The active analyst.
    pub fn current(&self) -> &Analyst {
        &self.roster[self.current]
    }

    /// The full roster.
    pub fn roster(&self) -> &[Analyst] {
        &self.roster
    }

    /// Switches the active analyst and persists the new id.
    pub fn switch(&mut self, analyst_id: &str) -> Result<&Analyst, SessionError> {
        let position = self
            .roster
            .iter()
            .position(|a| a.id == analyst_id)
            .ok_or_else(|| SessionError::UnknownAnalyst(analyst_id.to_string()))?;
        self.backend.store(analyst_id)?;
        self.current = position;
        let analyst = &self.roster[self.current];
        info!(analyst_id = %analyst.id, full_name = %analyst.full_name, "analyst switched");
        Ok(analyst)
    }
}
