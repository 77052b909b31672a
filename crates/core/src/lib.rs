//! # RCW Core
//!
//! Core business logic for the rehabilitation-centre case-management system:
//! - Role-gated approval workflows for leave requests and rehabilitation
//!   plans, with append-only audit trails
//! - Clinical validation of admission and checkup drafts
//! - Rule-derived goal suggestions for plan authoring
//!
//! The crate is pure in-process logic over caller-owned records: every
//! operation takes the acting user and the current record explicitly and
//! returns a new record value for the caller's store to commit.
//!
//! **No API concerns**: rendering, persistence and session management belong
//! to the embedding application.

pub mod authority;
pub mod beneficiary;
pub mod clinical;
pub mod config;
pub mod constants;
pub mod error;
pub mod store;
pub mod suggestions;
pub mod validation;
pub mod workflows;

// Re-export the shared validated primitives.
pub use rcw_types::{NonEmptyText, Progress};

// Re-export the types that make up the public surface.
pub use authority::{Actor, Role, RoleAuthority};
pub use beneficiary::{Beneficiary, ClinicalRiskFlags, ClinicalRiskSource, StaticRiskTable};
pub use config::CoreConfig;
pub use error::{CaseError, CaseResult};
pub use store::{Identified, MemoryStore};
pub use suggestions::{suggest_goals, GoalSuggestion};
pub use validation::{RecommendedActions, ValidationEngine, ValidationResult};
pub use workflows::leave::{
    LeaveRequest, LeaveStatus, LeaveWorkflow, MedicalAdvisory, NewLeaveRequest,
};
pub use workflows::plan::{PlanWorkflow, RehabPlan, SmartGoal};
