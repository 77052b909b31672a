//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid ambient lookups (a shared "current user"
//! context or process-wide globals) during workflow actions, which can lead to inconsistent
//! behaviour across sessions and makes gate checks impossible to test deterministically.

use crate::authority::Role;
use crate::error::{CaseError, CaseResult};

/// Core configuration resolved at startup.
///
/// The only policy knob the workflow core carries is the superuser role: the single
/// role, if any, allowed to satisfy an approval gate it does not hold. The source
/// system treated `admin` this way in individual call sites; here it is one named,
/// documented policy applied uniformly to both workflows.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    superuser: Option<Role>,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with an explicit superuser policy.
    ///
    /// `superuser` names the role that bypasses approval gates, or `None` for
    /// strict exact-match gating.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::InvalidInput` if a clinical or social role is named as
    /// superuser: the bypass exists for administrative coverage, and granting it to
    /// a role that already holds gates of its own would make the gate tables
    /// ambiguous.
    pub fn new(superuser: Option<Role>) -> CaseResult<Self> {
        if let Some(role) = superuser {
            if matches!(role, Role::Doctor | Role::SocialWorker | Role::Nurse) {
                return Err(CaseError::InvalidInput(format!(
                    "superuser role must be administrative, got {role}"
                )));
            }
        }
        Ok(Self { superuser })
    }

    /// The role that satisfies any approval gate, if one is configured.
    pub fn superuser(&self) -> Option<Role> {
        self.superuser
    }
}

impl Default for CoreConfig {
    /// The shipped policy: `admin` is the superuser, matching the source system's
    /// behaviour where the admin account stands in for the director.
    fn default() -> Self {
        Self {
            superuser: Some(Role::Admin),
        }
    }
}
