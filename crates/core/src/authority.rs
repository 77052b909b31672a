//! Roles, actors and permission checks.
//!
//! Every state-mutating workflow action takes the acting user as an explicit
//! parameter and must pass through [`RoleAuthority`] before any engine logic
//! runs. There is no role hierarchy: a director does not satisfy a doctor-only
//! gate. The one exception is the configured superuser role (see
//! [`CoreConfig`](crate::CoreConfig)), which satisfies any gate.

use crate::config::CoreConfig;
use crate::error::{CaseError, CaseResult};
use rcw_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Staff identity class. Attached to every actor and immutable for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Director,
    Doctor,
    SocialWorker,
    Nurse,
    Admin,
}

impl Role {
    /// Parses a role from its string representation.
    pub fn parse(s: &str) -> CaseResult<Self> {
        match s.to_lowercase().as_str() {
            "director" => Ok(Self::Director),
            "doctor" => Ok(Self::Doctor),
            "social_worker" => Ok(Self::SocialWorker),
            "nurse" => Ok(Self::Nurse),
            "admin" => Ok(Self::Admin),
            _ => Err(CaseError::InvalidInput(format!("Invalid role: {}", s))),
        }
    }

    /// The wire-format name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Doctor => "doctor",
            Self::SocialWorker => "social_worker",
            Self::Nurse => "nurse",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The acting user for a workflow operation.
///
/// Identity is supplied by the caller's session layer; the core never resolves
/// a "current user" ambiently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Session-scoped user identifier.
    pub id: String,

    /// Display name, denormalised into audit entries.
    pub name: NonEmptyText,

    /// The actor's role for this session.
    pub role: Role,
}

impl Actor {
    /// Creates an actor from caller-supplied identity parts.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::InvalidInput` if the id is blank, or a text error if
    /// the name is empty.
    pub fn new(id: impl Into<String>, name: impl AsRef<str>, role: Role) -> CaseResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CaseError::InvalidInput("actor id cannot be empty".into()));
        }
        Ok(Self {
            id,
            name: NonEmptyText::new(name)?,
            role,
        })
    }
}

/// Answers permission checks for workflow gates.
///
/// This is a thin, side-effect-free test; it must be consulted before every
/// state-mutating workflow action so refusals happen before any history write.
#[derive(Clone, Debug)]
pub struct RoleAuthority {
    cfg: Arc<CoreConfig>,
}

impl RoleAuthority {
    /// Creates a new authority over the given configuration.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Whether `acting` satisfies a gate held by any of `required`.
    ///
    /// Exact set-membership, no hierarchy. The configured superuser role, if
    /// any, satisfies every gate.
    pub fn has_permission(&self, required: &[Role], acting: Role) -> bool {
        if self.cfg.superuser() == Some(acting) {
            return true;
        }
        required.contains(&acting)
    }

    /// Admits the actor through the gate or returns a structured refusal.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::NotAuthorised` carrying the required roles and the
    /// acting role. The refusal is logged; no state has been touched when it is
    /// returned.
    pub fn ensure(&self, required: &[Role], actor: &Actor) -> CaseResult<()> {
        if self.has_permission(required, actor.role) {
            return Ok(());
        }
        tracing::warn!(
            actor = %actor.id,
            role = %actor.role,
            required = ?required,
            "permission denied"
        );
        Err(CaseError::NotAuthorised {
            required: required.to_vec(),
            acting: actor.role,
        })
    }
}
