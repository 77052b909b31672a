//! Approval workflow engines.
//!
//! Both engines take the acting user explicitly, check role gates before any
//! mutation, and return whole replacement records, but they differ in shape:
//! - [`leave`]: a linear multi-stage state machine with an append-only audit
//!   trail (leave requests).
//! - [`plan`]: independent per-role sign-offs that jointly unlock a final
//!   director gate (rehabilitation plans).

pub mod leave;
pub mod plan;
