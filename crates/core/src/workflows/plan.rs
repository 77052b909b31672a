//! Rehabilitation-plan governance workflow.
//!
//! Unlike the linear leave workflow, plan sign-off fans out: the doctor and
//! social worker approve independently, in any order, and only once both have
//! signed does the director's final gate unlock. Approvals are terminal
//! (there is no unapprove), and the plan's own lifecycle status stays in the
//! caller's hands; this engine only answers whether sign-off is complete.
//!
//! Goal-list editing is deliberately unrestricted by role and approval state,
//! matching the centre's existing practice; edits to a plan that already
//! carries an approval are logged so the hazard is visible.

use crate::authority::{Actor, Role, RoleAuthority};
use crate::beneficiary::Beneficiary;
use crate::config::CoreConfig;
use crate::error::{CaseError, CaseResult};
use crate::suggestions::GoalSuggestion;
use chrono::{DateTime, NaiveDate, Utc};
use rcw_types::Progress;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Record types
// ============================================================================

/// Discipline a SMART goal belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Medical,
    Social,
    Psychological,
    Physiotherapy,
    Occupational,
}

/// Delivery status of a single goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pending,
    InProgress,
    Achieved,
    Delayed,
}

/// A specific, measurable, time-bound rehabilitation objective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartGoal {
    pub id: Uuid,
    pub goal_type: GoalType,
    pub title: String,

    /// The measurable criterion the goal is tracked against.
    pub measure_of_success: String,

    /// Target completion date, once set.
    pub target_date: Option<NaiveDate>,

    pub progress: Progress,
    pub status: GoalStatus,

    /// Specialist responsible for delivery.
    pub assigned_to: String,
}

/// The three sign-off slots a plan carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRole {
    Doctor,
    SocialWorker,
    Director,
}

impl ApprovalRole {
    /// The staff role that holds this sign-off gate.
    pub fn required_role(&self) -> Role {
        match self {
            Self::Doctor => Role::Doctor,
            Self::SocialWorker => Role::SocialWorker,
            Self::Director => Role::Director,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::SocialWorker => "social_worker",
            Self::Director => "director",
        }
    }
}

impl std::fmt::Display for ApprovalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one sign-off slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ApprovalState {
    /// Not yet granted.
    Pending,
    /// Granted; terminal for this slot.
    Approved {
        approved_by: String,
        approved_by_name: String,
        approved_at: DateTime<Utc>,
    },
}

impl ApprovalState {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }
}

/// The plan's fixed set of exactly three sign-off slots, one per role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanApprovals {
    pub doctor: ApprovalState,
    pub social_worker: ApprovalState,
    pub director: ApprovalState,
}

impl PlanApprovals {
    /// All three slots pending.
    pub fn pending() -> Self {
        Self {
            doctor: ApprovalState::Pending,
            social_worker: ApprovalState::Pending,
            director: ApprovalState::Pending,
        }
    }

    /// The state of one slot.
    pub fn get(&self, role: ApprovalRole) -> &ApprovalState {
        match role {
            ApprovalRole::Doctor => &self.doctor,
            ApprovalRole::SocialWorker => &self.social_worker,
            ApprovalRole::Director => &self.director,
        }
    }

    fn get_mut(&mut self, role: ApprovalRole) -> &mut ApprovalState {
        match role {
            ApprovalRole::Doctor => &mut self.doctor,
            ApprovalRole::SocialWorker => &mut self.social_worker,
            ApprovalRole::Director => &mut self.director,
        }
    }

    /// Whether the peer sign-offs gating the director's approval are in.
    pub fn peers_approved(&self) -> bool {
        self.doctor.is_approved() && self.social_worker.is_approved()
    }

    /// Whether all three sign-offs are in.
    pub fn is_fully_approved(&self) -> bool {
        self.peers_approved() && self.director.is_approved()
    }

    /// Whether any sign-off has been granted yet.
    pub fn any_approved(&self) -> bool {
        self.doctor.is_approved() || self.social_worker.is_approved() || self.director.is_approved()
    }
}

/// Risk banding captured in the plan's social context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Medical context captured at plan-authoring time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalContext {
    pub diagnosis: String,
    pub needs: Vec<String>,
}

/// Social context captured at plan-authoring time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContext {
    pub economic_status: String,
    pub risk_level: RiskLevel,
}

/// Caller-managed plan lifecycle; never flipped by this engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

/// A rehabilitation plan owned by one beneficiary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RehabPlan {
    pub id: Uuid,
    pub beneficiary_id: Uuid,
    pub beneficiary_name: String,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    /// Context captured when the plan was authored; later changes to the
    /// beneficiary record do not flow back into it.
    pub medical_context: MedicalContext,
    pub social_context: SocialContext,

    pub goals: Vec<SmartGoal>,
    pub approvals: PlanApprovals,
    pub status: PlanStatus,
}

/// Caller-supplied fields for a new goal.
#[derive(Clone, Debug, Default)]
pub struct NewGoal {
    pub goal_type: Option<GoalType>,
    pub title: String,
    pub measure_of_success: String,
    pub target_date: Option<NaiveDate>,
    pub assigned_to: String,
}

/// Field-wise goal update; `Some` replaces, `None` leaves as is.
#[derive(Clone, Debug, Default)]
pub struct GoalUpdate {
    pub goal_type: Option<GoalType>,
    pub title: Option<String>,
    pub measure_of_success: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub progress: Option<Progress>,
    pub status: Option<GoalStatus>,
    pub assigned_to: Option<String>,
}

// ============================================================================
// Workflow engine
// ============================================================================

/// The plan governance engine.
///
/// Holds no plan state: every operation takes the current record and returns
/// a new one, leaving storage to the caller's store.
#[derive(Clone, Debug)]
pub struct PlanWorkflow {
    authority: RoleAuthority,
}

impl PlanWorkflow {
    /// Creates the engine over the given configuration.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            authority: RoleAuthority::new(cfg),
        }
    }

    /// Authors a draft plan for a beneficiary, snapshotting the medical and
    /// social context as it stands now.
    ///
    /// Risk is banded `medium` until an assessment refines it.
    pub fn new_plan(&self, beneficiary: &Beneficiary) -> RehabPlan {
        RehabPlan {
            id: Uuid::new_v4(),
            beneficiary_id: beneficiary.id,
            beneficiary_name: beneficiary.full_name.clone(),
            start_date: None,
            end_date: None,
            medical_context: MedicalContext {
                diagnosis: beneficiary.medical_diagnosis.clone(),
                needs: Vec::new(),
            },
            social_context: SocialContext {
                economic_status: beneficiary.social_status.clone(),
                risk_level: RiskLevel::Medium,
            },
            goals: Vec::new(),
            approvals: PlanApprovals::pending(),
            status: PlanStatus::Draft,
        }
    }

    /// Grants one sign-off slot, returning the updated plan.
    ///
    /// The doctor and social-worker slots are independent; the director slot
    /// unlocks only once both peers have signed. A granted slot is terminal.
    ///
    /// # Errors
    ///
    /// - `CaseError::NotAuthorised` if the actor does not hold the slot's
    ///   role (the configured superuser passes any slot).
    /// - `CaseError::AlreadyApproved` if the slot was already granted.
    /// - `CaseError::PeerApprovalsPending` if the director slot is attempted
    ///   before both peer approvals are in.
    pub fn approve(
        &self,
        plan: &RehabPlan,
        slot: ApprovalRole,
        actor: &Actor,
    ) -> CaseResult<RehabPlan> {
        self.authority.ensure(&[slot.required_role()], actor)?;

        if plan.approvals.get(slot).is_approved() {
            return Err(CaseError::AlreadyApproved { role: slot });
        }
        if slot == ApprovalRole::Director && !plan.approvals.peers_approved() {
            tracing::warn!(
                plan = %plan.id,
                actor = %actor.id,
                "director sign-off attempted before peer approvals"
            );
            return Err(CaseError::PeerApprovalsPending);
        }

        let mut next = plan.clone();
        *next.approvals.get_mut(slot) = ApprovalState::Approved {
            approved_by: actor.id.clone(),
            approved_by_name: actor.name.as_str().to_owned(),
            approved_at: Utc::now(),
        };

        tracing::info!(
            plan = %plan.id,
            slot = %slot,
            actor = %actor.id,
            fully_approved = next.approvals.is_fully_approved(),
            "plan sign-off granted"
        );
        Ok(next)
    }

    /// Adds a goal to the plan.
    ///
    /// Goal editing is open to any actor with plan-edit access, at any
    /// approval state. New goals start pending with zero progress; an unset
    /// type defaults to medical, mirroring the manual-add form.
    pub fn add_goal(&self, plan: &RehabPlan, goal: NewGoal, actor: &Actor) -> RehabPlan {
        self.warn_if_signed(plan, actor, "goal added");

        let mut next = plan.clone();
        next.goals.push(SmartGoal {
            id: Uuid::new_v4(),
            goal_type: goal.goal_type.unwrap_or(GoalType::Medical),
            title: goal.title,
            measure_of_success: goal.measure_of_success,
            target_date: goal.target_date,
            progress: Progress::ZERO,
            status: GoalStatus::Pending,
            assigned_to: goal.assigned_to,
        });
        next
    }

    /// Adds a goal pre-filled from an accepted suggestion.
    ///
    /// Equivalent to a manual [`add_goal`](Self::add_goal) carrying the
    /// suggested type and title.
    pub fn add_suggested_goal(
        &self,
        plan: &RehabPlan,
        suggestion: &GoalSuggestion,
        actor: &Actor,
    ) -> RehabPlan {
        self.add_goal(
            plan,
            NewGoal {
                goal_type: Some(suggestion.goal_type),
                title: suggestion.title.clone(),
                assigned_to: actor.name.as_str().to_owned(),
                ..NewGoal::default()
            },
            actor,
        )
    }

    /// Applies a field-wise update to one goal.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::GoalNotFound` if no goal carries the id.
    pub fn update_goal(
        &self,
        plan: &RehabPlan,
        goal_id: Uuid,
        update: GoalUpdate,
        actor: &Actor,
    ) -> CaseResult<RehabPlan> {
        self.warn_if_signed(plan, actor, "goal updated");

        let mut next = plan.clone();
        let goal = next
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or(CaseError::GoalNotFound(goal_id))?;

        if let Some(goal_type) = update.goal_type {
            goal.goal_type = goal_type;
        }
        if let Some(title) = update.title {
            goal.title = title;
        }
        if let Some(measure) = update.measure_of_success {
            goal.measure_of_success = measure;
        }
        if let Some(target_date) = update.target_date {
            goal.target_date = Some(target_date);
        }
        if let Some(progress) = update.progress {
            goal.progress = progress;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        if let Some(assigned_to) = update.assigned_to {
            goal.assigned_to = assigned_to;
        }

        Ok(next)
    }

    /// Removes one goal from the plan.
    ///
    /// # Errors
    ///
    /// Returns `CaseError::GoalNotFound` if no goal carries the id.
    pub fn remove_goal(
        &self,
        plan: &RehabPlan,
        goal_id: Uuid,
        actor: &Actor,
    ) -> CaseResult<RehabPlan> {
        if !plan.goals.iter().any(|g| g.id == goal_id) {
            return Err(CaseError::GoalNotFound(goal_id));
        }
        self.warn_if_signed(plan, actor, "goal removed");

        let mut next = plan.clone();
        next.goals.retain(|g| g.id != goal_id);
        Ok(next)
    }

    /// Whether all three sign-offs are in.
    ///
    /// The plan's own lifecycle status is the caller's to advance; full
    /// sign-off does not flip it.
    pub fn is_fully_approved(&self, plan: &RehabPlan) -> bool {
        plan.approvals.is_fully_approved()
    }

    // Goal edits after sign-off silently invalidate what was approved; the
    // behaviour is kept (it is the centre's existing practice) but logged.
    fn warn_if_signed(&self, plan: &RehabPlan, actor: &Actor, what: &str) {
        if plan.approvals.any_approved() {
            tracing::warn!(
                plan = %plan.id,
                actor = %actor.id,
                "{what} on a plan that already carries a sign-off"
            );
        }
    }
}
