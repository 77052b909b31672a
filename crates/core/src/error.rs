use crate::authority::Role;
use crate::workflows::leave::{ActionKind, LeaveStatus};
use crate::workflows::plan::ApprovalRole;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("the admission draft failed clinical validation ({} field(s))", .errors.len())]
    ValidationFailed { errors: BTreeMap<String, String> },

    #[error("action requires one of {required:?}, but the acting user is {acting}")]
    NotAuthorised { required: Vec<Role>, acting: Role },

    #[error("cannot {action} a leave request in status {status}")]
    InvalidTransition {
        status: LeaveStatus,
        action: ActionKind,
    },

    #[error("the {role} approval has already been granted and cannot be repeated")]
    AlreadyApproved { role: ApprovalRole },

    #[error("director sign-off requires the doctor and social worker approvals first")]
    PeerApprovalsPending,

    #[error("no goal with id {0} exists on this plan")]
    GoalNotFound(Uuid),

    #[error("invalid text: {0}")]
    Text(#[from] rcw_types::TextError),
}

pub type CaseResult<T> = std::result::Result<T, CaseError>;
