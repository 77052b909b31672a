//! Leave-request approval workflow.
//!
//! A leave request moves through a linear, role-gated state machine:
//!
//! ```text
//! PENDING_MEDICAL ──approve(doctor)──▶ PENDING_DIRECTOR ──approve(director)──▶ APPROVED
//!        │                                    │
//!        └────────────reject─────────────────┴──▶ REJECTED
//! ```
//!
//! Transition legality is an explicit `(status, action, role)` table; the
//! role gate is checked before any engine logic runs, and every legal
//! transition produces a **new** record value whose history is the old
//! history plus exactly one appended entry. The post-approval lifecycle
//! (`ACTIVE`/`COMPLETED`/`OVERDUE`) belongs to the external attendance
//! tracker; this engine treats those states, like `APPROVED` and `REJECTED`,
//! as terminal.

use crate::authority::{Actor, Role, RoleAuthority};
use crate::beneficiary::{ClinicalRiskFlags, ClinicalRiskSource};
use crate::config::CoreConfig;
use crate::error::{CaseError, CaseResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Record types
// ============================================================================

/// Category of leave being requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    HomeVisit,
    Hospital,
    Outing,
    Other,
}

/// Workflow state of a leave request.
///
/// `PendingMedical`, `PendingDirector`, `Approved` and `Rejected` are driven
/// by this engine; the remaining states are stamped by external attendance
/// tracking once a request is approved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    PendingMedical,
    PendingDirector,
    Approved,
    Rejected,
    Active,
    Completed,
    Overdue,
}

impl LeaveStatus {
    /// The wire-format name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingMedical => "PENDING_MEDICAL",
            Self::PendingDirector => "PENDING_DIRECTOR",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Overdue => "OVERDUE",
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of action recorded in the audit trail.
///
/// `Cancel` is part of the recorded data model for completeness of the
/// history format; the engine itself exposes no cancel operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Request,
    Approve,
    Reject,
    Cancel,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Request => "request",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

/// One append-only audit-trail entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAction {
    /// Acting user's id.
    pub actor_id: String,

    /// Acting user's display name at the time of the action.
    pub actor_name: String,

    /// Acting user's role at the time of the action.
    pub role: Role,

    /// When the action was taken.
    pub at: DateTime<Utc>,

    /// What was done.
    pub kind: ActionKind,

    /// Optional free-text note entered with the decision.
    pub note: Option<String>,
}

/// Immutable snapshot of the doctor's sign-off, captured exactly once when a
/// request leaves medical review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalClearance {
    pub cleared_by: String,
    pub cleared_by_name: String,
    pub cleared_at: DateTime<Utc>,
    pub is_fit: bool,
    pub precautions: Option<String>,
}

/// A request for a beneficiary to leave the facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub beneficiary_id: Uuid,
    pub beneficiary_name: String,

    pub request_date: NaiveDate,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,

    pub guardian_name: String,
    pub guardian_phone: String,
    pub reason: String,

    pub status: LeaveStatus,
    pub medical_clearance: Option<MedicalClearance>,

    /// Append-only audit trail; every status transition appends exactly one
    /// entry, and prior entries are never altered.
    pub history: Vec<LeaveAction>,

    /// Stamped by external attendance tracking, never by this engine.
    pub actual_return_date: Option<NaiveDate>,
}

/// Caller-supplied fields for a new leave request.
#[derive(Clone, Debug)]
pub struct NewLeaveRequest {
    pub beneficiary_id: Uuid,
    pub beneficiary_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub reason: String,
}

/// Decision support surfaced to the reviewing doctor.
///
/// Advisory only: an elevated advisory never blocks or auto-rejects a
/// request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MedicalAdvisory {
    /// No medical contraindications apparent.
    Stable,
    /// Infection suspicion or unstable vitals are on file.
    Elevated(ClinicalRiskFlags),
}

impl MedicalAdvisory {
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Elevated(_))
    }
}

// ============================================================================
// Workflow engine
// ============================================================================

/// The leave-request approval engine.
///
/// Holds no request state: every operation takes the current record and
/// returns a new one, leaving storage to the caller's store.
#[derive(Clone, Debug)]
pub struct LeaveWorkflow {
    authority: RoleAuthority,
}

impl LeaveWorkflow {
    /// Creates the engine over the given configuration.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            authority: RoleAuthority::new(cfg),
        }
    }

    /// Creates a new request in `PENDING_MEDICAL` with a single `request`
    /// history entry.
    ///
    /// Requests are authored by the social worker (and are implicitly
    /// pre-cleared socially).
    ///
    /// # Errors
    ///
    /// - `CaseError::NotAuthorised` if the actor does not hold the
    ///   social-worker gate.
    /// - `CaseError::InvalidInput` if the return date precedes the start
    ///   date.
    pub fn create(
        &self,
        actor: &Actor,
        params: NewLeaveRequest,
        note: Option<&str>,
    ) -> CaseResult<LeaveRequest> {
        self.authority.ensure(&[Role::SocialWorker], actor)?;

        let duration_days = (params.end_date - params.start_date).num_days();
        if duration_days < 0 {
            return Err(CaseError::InvalidInput(
                "leave end date cannot precede the start date".into(),
            ));
        }

        let now = Utc::now();
        let request = LeaveRequest {
            id: Uuid::new_v4(),
            beneficiary_id: params.beneficiary_id,
            beneficiary_name: params.beneficiary_name,
            request_date: now.date_naive(),
            leave_type: params.leave_type,
            start_date: params.start_date,
            end_date: params.end_date,
            duration_days,
            guardian_name: params.guardian_name,
            guardian_phone: params.guardian_phone,
            reason: params.reason,
            status: LeaveStatus::PendingMedical,
            medical_clearance: None,
            history: vec![Self::entry(actor, now, ActionKind::Request, note)],
            actual_return_date: None,
        };

        tracing::info!(request = %request.id, beneficiary = %request.beneficiary_id, "leave request created");
        Ok(request)
    }

    /// Approves the request at its current gate, returning the advanced
    /// record.
    ///
    /// At `PENDING_MEDICAL` the doctor's approval writes the one-and-only
    /// medical-clearance snapshot and moves the request to
    /// `PENDING_DIRECTOR`; at `PENDING_DIRECTOR` the director's approval
    /// moves it to `APPROVED` with no further snapshot.
    ///
    /// # Errors
    ///
    /// - `CaseError::InvalidTransition` if the request is not at a pending
    ///   gate.
    /// - `CaseError::NotAuthorised` if the actor does not hold the gate.
    ///
    /// Either refusal leaves the record untouched; no partial history is
    /// ever written.
    pub fn approve(
        &self,
        request: &LeaveRequest,
        actor: &Actor,
        note: Option<&str>,
    ) -> CaseResult<LeaveRequest> {
        let (gate, to) = Self::transition(request.status, ActionKind::Approve)?;
        self.authority.ensure(gate, actor)?;

        let now = Utc::now();
        let mut next = request.clone();
        next.status = to;
        next.history.push(Self::entry(actor, now, ActionKind::Approve, note));

        // The snapshot is written exactly once, on leaving medical review.
        if request.status == LeaveStatus::PendingMedical {
            next.medical_clearance = Some(MedicalClearance {
                cleared_by: actor.id.clone(),
                cleared_by_name: actor.name.as_str().to_owned(),
                cleared_at: now,
                is_fit: true,
                precautions: note.map(str::to_owned),
            });
        }

        tracing::info!(
            request = %request.id,
            from = %request.status,
            to = %next.status,
            actor = %actor.id,
            "leave request approved"
        );
        Ok(next)
    }

    /// Rejects the request from either pending gate.
    ///
    /// The record moves to `REJECTED` with a single `reject` history entry;
    /// all other fields are frozen as they stood.
    ///
    /// # Errors
    ///
    /// As for [`approve`](Self::approve): a structured refusal, with no
    /// mutation, when the status holds no gate or the actor does not hold it.
    pub fn reject(
        &self,
        request: &LeaveRequest,
        actor: &Actor,
        note: Option<&str>,
    ) -> CaseResult<LeaveRequest> {
        let (gate, to) = Self::transition(request.status, ActionKind::Reject)?;
        self.authority.ensure(gate, actor)?;

        let mut next = request.clone();
        next.status = to;
        next.history
            .push(Self::entry(actor, Utc::now(), ActionKind::Reject, note));

        tracing::info!(
            request = %request.id,
            from = %request.status,
            actor = %actor.id,
            "leave request rejected"
        );
        Ok(next)
    }

    /// Cross-references the beneficiary's current medical-risk flags for the
    /// reviewing doctor.
    ///
    /// Read-only and non-blocking: the caller renders the advisory alongside
    /// the decision controls and the engine never consults it when applying
    /// a transition.
    pub fn advisory(
        &self,
        request: &LeaveRequest,
        risk_source: &dyn ClinicalRiskSource,
    ) -> MedicalAdvisory {
        match risk_source.risk_flags(request.beneficiary_id) {
            Some(flags) if flags.infection || flags.unstable_vitals => {
                tracing::warn!(
                    request = %request.id,
                    beneficiary = %request.beneficiary_id,
                    infection = flags.infection,
                    unstable_vitals = flags.unstable_vitals,
                    "medical risk flags raised during leave review"
                );
                MedicalAdvisory::Elevated(flags)
            }
            _ => MedicalAdvisory::Stable,
        }
    }

    /// Filters a request list down to what a role may see.
    ///
    /// Social workers and the director-equivalent see everything; doctors see
    /// requests awaiting medical review plus approved ones; other roles see
    /// nothing.
    pub fn visible_to<'a>(
        &self,
        requests: &'a [LeaveRequest],
        role: Role,
    ) -> Vec<&'a LeaveRequest> {
        requests
            .iter()
            .filter(|r| match role {
                Role::SocialWorker | Role::Director => true,
                Role::Doctor => matches!(
                    r.status,
                    LeaveStatus::PendingMedical | LeaveStatus::Approved
                ),
                other => self.authority.has_permission(&[], other),
            })
            .collect()
    }

    /// The transition table: `(status, action) -> (required gate, next status)`.
    ///
    /// Only the two pending states hold gates, each held by exactly one role;
    /// every other combination is an illegal transition.
    fn transition(
        status: LeaveStatus,
        action: ActionKind,
    ) -> CaseResult<(&'static [Role], LeaveStatus)> {
        use ActionKind::*;
        use LeaveStatus::*;

        match (status, action) {
            (PendingMedical, Approve) => Ok((&[Role::Doctor], PendingDirector)),
            (PendingDirector, Approve) => Ok((&[Role::Director], Approved)),
            (PendingMedical, Reject) => Ok((&[Role::Doctor], Rejected)),
            (PendingDirector, Reject) => Ok((&[Role::Director], Rejected)),
            _ => Err(CaseError::InvalidTransition { status, action }),
        }
    }

    fn entry(
        actor: &Actor,
        at: DateTime<Utc>,
        kind: ActionKind,
        note: Option<&str>,
    ) -> LeaveAction {
        LeaveAction {
            actor_id: actor.id.clone(),
            actor_name: actor.name.as_str().to_owned(),
            role: actor.role,
            at,
            kind,
            note: note.map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beneficiary::StaticRiskTable;

    fn workflow() -> LeaveWorkflow {
        LeaveWorkflow::new(Arc::new(CoreConfig::default()))
    }

    fn strict_workflow() -> LeaveWorkflow {
        let cfg = CoreConfig::new(None).expect("strict config");
        LeaveWorkflow::new(Arc::new(cfg))
    }

    fn actor(role: Role) -> Actor {
        let id = format!("u-{}", role.as_str());
        Actor::new(id, "Test User", role).expect("valid actor")
    }

    fn params() -> NewLeaveRequest {
        NewLeaveRequest {
            beneficiary_id: Uuid::new_v4(),
            beneficiary_name: "Ahmed M.".into(),
            leave_type: LeaveType::HomeVisit,
            start_date: NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 3).expect("valid date"),
            guardian_name: "Mohammed A.".into(),
            guardian_phone: "0500000000".into(),
            reason: "Weekend family visit".into(),
        }
    }

    fn pending_medical() -> LeaveRequest {
        workflow()
            .create(&actor(Role::SocialWorker), params(), Some("guardian confirmed"))
            .expect("social worker may create")
    }

    #[test]
    fn creation_starts_in_pending_medical() {
        let request = pending_medical();
        assert_eq!(request.status, LeaveStatus::PendingMedical);
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].kind, ActionKind::Request);
        assert_eq!(request.history[0].role, Role::SocialWorker);
        assert!(request.medical_clearance.is_none());
    }

    #[test]
    fn duration_is_computed_from_the_dates() {
        let request = pending_medical();
        assert_eq!(request.duration_days, 2);
    }

    #[test]
    fn creation_rejects_inverted_dates() {
        let mut inverted = params();
        inverted.end_date = NaiveDate::from_ymd_opt(2023, 11, 30).expect("valid date");
        let err = workflow()
            .create(&actor(Role::SocialWorker), inverted, None)
            .expect_err("inverted dates should fail");
        assert!(matches!(err, CaseError::InvalidInput(_)));
    }

    #[test]
    fn creation_is_gated_on_the_social_worker() {
        let err = strict_workflow()
            .create(&actor(Role::Nurse), params(), None)
            .expect_err("nurse may not create");
        assert!(matches!(err, CaseError::NotAuthorised { .. }));
    }

    #[test]
    fn doctor_approval_writes_the_clearance_snapshot() {
        let request = pending_medical();
        let next = workflow()
            .approve(&request, &actor(Role::Doctor), Some("fit to travel"))
            .expect("doctor approves at medical gate");

        assert_eq!(next.status, LeaveStatus::PendingDirector);
        assert_eq!(next.history.len(), 2);
        let clearance = next.medical_clearance.expect("snapshot written");
        assert!(clearance.is_fit);
        assert_eq!(clearance.precautions.as_deref(), Some("fit to travel"));
        assert_eq!(clearance.cleared_by, "u-doctor");
    }

    #[test]
    fn director_approval_does_not_touch_the_clearance() {
        let wf = workflow();
        let request = pending_medical();
        let cleared = wf
            .approve(&request, &actor(Role::Doctor), None)
            .expect("doctor approves");
        let approved = wf
            .approve(&cleared, &actor(Role::Director), Some("approved"))
            .expect("director approves");

        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.history.len(), 3);
        assert_eq!(approved.medical_clearance, cleared.medical_clearance);
    }

    #[test]
    fn medical_gate_admits_only_the_doctor() {
        let wf = strict_workflow();
        let request = pending_medical();

        for role in [Role::Director, Role::SocialWorker, Role::Nurse, Role::Admin] {
            let err = wf
                .approve(&request, &actor(role), None)
                .expect_err("non-doctor should be refused at the medical gate");
            assert!(matches!(err, CaseError::NotAuthorised { .. }));
        }

        wf.approve(&request, &actor(Role::Doctor), None)
            .expect("doctor passes the medical gate");
    }

    #[test]
    fn director_gate_admits_only_the_director() {
        let wf = strict_workflow();
        let cleared = wf
            .approve(&pending_medical(), &actor(Role::Doctor), None)
            .expect("doctor approves");

        for role in [Role::Doctor, Role::SocialWorker, Role::Nurse, Role::Admin] {
            let err = wf
                .approve(&cleared, &actor(role), None)
                .expect_err("non-director should be refused at the director gate");
            assert!(matches!(err, CaseError::NotAuthorised { .. }));
        }

        wf.approve(&cleared, &actor(Role::Director), None)
            .expect("director passes the director gate");
    }

    #[test]
    fn configured_superuser_stands_in_for_the_director() {
        let wf = workflow();
        let cleared = wf
            .approve(&pending_medical(), &actor(Role::Doctor), None)
            .expect("doctor approves");
        let approved = wf
            .approve(&cleared, &actor(Role::Admin), None)
            .expect("admin is the configured superuser");
        assert_eq!(approved.status, LeaveStatus::Approved);
    }

    #[test]
    fn rejection_freezes_the_request() {
        let wf = workflow();
        let cleared = wf
            .approve(&pending_medical(), &actor(Role::Doctor), None)
            .expect("doctor approves");
        let rejected = wf
            .reject(&cleared, &actor(Role::Director), Some("dates clash with review"))
            .expect("director rejects at the director gate");

        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(rejected.history.len(), 3);
        assert_eq!(rejected.medical_clearance, cleared.medical_clearance);
        assert_eq!(rejected.reason, cleared.reason);

        // Terminal: nothing further is permitted.
        let err = wf
            .approve(&rejected, &actor(Role::Director), None)
            .expect_err("rejected requests accept no transitions");
        assert!(matches!(
            err,
            CaseError::InvalidTransition {
                status: LeaveStatus::Rejected,
                action: ActionKind::Approve,
            }
        ));
    }

    #[test]
    fn approved_is_terminal_for_the_engine() {
        let wf = workflow();
        let cleared = wf
            .approve(&pending_medical(), &actor(Role::Doctor), None)
            .expect("doctor approves");
        let approved = wf
            .approve(&cleared, &actor(Role::Director), None)
            .expect("director approves");

        let err = wf
            .approve(&approved, &actor(Role::Director), None)
            .expect_err("approved requests accept no further approvals");
        assert!(matches!(err, CaseError::InvalidTransition { .. }));

        let err = wf
            .reject(&approved, &actor(Role::Director), None)
            .expect_err("approved requests accept no rejections");
        assert!(matches!(err, CaseError::InvalidTransition { .. }));
    }

    #[test]
    fn refused_transitions_write_no_history() {
        let wf = strict_workflow();
        let request = pending_medical();
        let before = serde_json::to_string(&request).expect("serialize");

        let _ = wf.approve(&request, &actor(Role::Nurse), None);
        let _ = wf.reject(&request, &actor(Role::Nurse), None);

        let after = serde_json::to_string(&request).expect("serialize");
        assert_eq!(before, after, "refusals must not touch the record");
    }

    #[test]
    fn history_grows_by_exactly_one_per_transition_and_is_immutable() {
        let wf = workflow();
        let created = pending_medical();
        let cleared = wf
            .approve(&created, &actor(Role::Doctor), Some("fit"))
            .expect("doctor approves");
        let approved = wf
            .approve(&cleared, &actor(Role::Director), None)
            .expect("director approves");

        assert_eq!(created.history.len(), 1);
        assert_eq!(cleared.history.len(), 2);
        assert_eq!(approved.history.len(), 3);

        // Prior entries are carried over byte-for-byte.
        for (stage, parent) in [(&cleared, &created), (&approved, &cleared)] {
            for (idx, entry) in parent.history.iter().enumerate() {
                let parent_json = serde_json::to_string(entry).expect("serialize");
                let child_json =
                    serde_json::to_string(&stage.history[idx]).expect("serialize");
                assert_eq!(parent_json, child_json);
            }
        }
    }

    #[test]
    fn transitions_replace_rather_than_mutate() {
        let wf = workflow();
        let request = pending_medical();
        let _next = wf
            .approve(&request, &actor(Role::Doctor), None)
            .expect("doctor approves");

        // The input record is untouched; the caller swaps whole values.
        assert_eq!(request.status, LeaveStatus::PendingMedical);
        assert_eq!(request.history.len(), 1);
    }

    #[test]
    fn advisory_reflects_the_risk_table() {
        let wf = workflow();
        let request = pending_medical();

        let mut table = StaticRiskTable::new();
        assert_eq!(wf.advisory(&request, &table), MedicalAdvisory::Stable);

        table.insert(
            request.beneficiary_id,
            ClinicalRiskFlags {
                infection: true,
                unstable_vitals: true,
                notes: "Suspected influenza, high fever".into(),
            },
        );
        let advisory = wf.advisory(&request, &table);
        assert!(advisory.is_elevated());

        // Advisory never blocks: the doctor may still approve.
        wf.approve(&request, &actor(Role::Doctor), Some("cleared with precautions"))
            .expect("elevated advisory must not block approval");
    }

    #[test]
    fn visibility_is_role_scoped() {
        let wf = workflow();
        let pending = pending_medical();
        let approved = {
            let cleared = wf
                .approve(&pending_medical(), &actor(Role::Doctor), None)
                .expect("doctor approves");
            wf.approve(&cleared, &actor(Role::Director), None)
                .expect("director approves")
        };
        let in_director_review = wf
            .approve(&pending_medical(), &actor(Role::Doctor), None)
            .expect("doctor approves");

        let all = vec![pending, approved, in_director_review];

        assert_eq!(wf.visible_to(&all, Role::SocialWorker).len(), 3);
        assert_eq!(wf.visible_to(&all, Role::Director).len(), 3);
        // Doctor sees the medical queue and approved outcomes only.
        assert_eq!(wf.visible_to(&all, Role::Doctor).len(), 2);
        assert!(wf.visible_to(&all, Role::Nurse).is_empty());
    }
}
