//! Beneficiary records and the clinical-risk collaborator.
//!
//! The core operates on a beneficiary snapshot supplied by the caller's data
//! store; it never owns or persists the record. The medical-risk lookup used
//! for leave-review decision support is modelled as a read-only trait so the
//! workflow can be tested against a fixed table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The beneficiary attributes the workflow core consumes.
///
/// This is the caller's record, passed by reference; changes to it after a
/// plan or request has been authored do not retroactively alter captured
/// context snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Unique identifier in the caller's store.
    pub id: Uuid,

    /// Full display name.
    pub full_name: String,

    /// Age in years.
    pub age: u8,

    /// Free-text medical diagnosis line.
    pub medical_diagnosis: String,

    /// Free-text social/economic status line.
    pub social_status: String,

    /// Case-file notes.
    pub notes: String,
}

/// Current medical-risk flags for a beneficiary.
///
/// Surfaced to the reviewing doctor as a non-blocking advisory during leave
/// review; never consulted to auto-reject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalRiskFlags {
    /// Suspected or confirmed infection.
    pub infection: bool,

    /// Vitals outside normal ranges on the latest checkup.
    pub unstable_vitals: bool,

    /// Short clinical summary for display.
    pub notes: String,
}

/// Read-only collaborator answering "what are this beneficiary's current risk flags?".
///
/// Implemented by the caller over whatever medical store it owns. The workflow
/// core only ever reads through this interface.
pub trait ClinicalRiskSource {
    /// Returns the current flags, or `None` when no medical status is on file.
    fn risk_flags(&self, beneficiary_id: Uuid) -> Option<ClinicalRiskFlags>;
}

/// A fixed in-memory risk table.
///
/// Suitable for tests and for callers that refresh a snapshot table out of
/// band.
#[derive(Clone, Debug, Default)]
pub struct StaticRiskTable {
    entries: HashMap<Uuid, ClinicalRiskFlags>,
}

impl StaticRiskTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the flags for a beneficiary.
    pub fn insert(&mut self, beneficiary_id: Uuid, flags: ClinicalRiskFlags) {
        self.entries.insert(beneficiary_id, flags);
    }
}

impl ClinicalRiskSource for StaticRiskTable {
    fn risk_flags(&self, beneficiary_id: Uuid) -> Option<ClinicalRiskFlags> {
        self.entries.get(&beneficiary_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_beneficiary_has_no_flags() {
        let table = StaticRiskTable::new();
        assert!(table.risk_flags(Uuid::new_v4()).is_none());
    }

    #[test]
    fn insert_replaces_previous_flags() {
        let id = Uuid::new_v4();
        let mut table = StaticRiskTable::new();
        table.insert(
            id,
            ClinicalRiskFlags {
                infection: true,
                unstable_vitals: true,
                notes: "Suspected influenza, high fever".into(),
            },
        );
        table.insert(
            id,
            ClinicalRiskFlags {
                infection: false,
                unstable_vitals: false,
                notes: "Stable".into(),
            },
        );

        let flags = table.risk_flags(id).expect("flags on file");
        assert!(!flags.infection);
        assert_eq!(flags.notes, "Stable");
    }
}
