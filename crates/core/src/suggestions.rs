//! Candidate-goal suggestions derived from beneficiary attributes.
//!
//! A declarative rule table is matched against the beneficiary's diagnosis
//! text, social status/notes and age. Rules are independent and cumulative:
//! zero, one or many may fire, emitted in declaration order, and no rule
//! suppresses another. Output is advisory: accepting a suggestion is the
//! same as manually adding a goal pre-filled with the suggested type and
//! title.

use crate::beneficiary::Beneficiary;
use crate::constants::SPECIAL_EDUCATION_MAX_AGE;
use crate::workflows::plan::GoalType;
use serde::{Deserialize, Serialize};

/// A candidate goal for the plan-authoring surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSuggestion {
    pub goal_type: GoalType,
    pub title: String,

    /// Why the rule fired, for display next to the suggestion.
    pub reason: String,
}

/// One row of the rule table.
struct SuggestionRule {
    matches: fn(&Beneficiary) -> bool,
    goal_type: GoalType,
    title: &'static str,
    reason: &'static str,
}

/// The rule table, in emission order.
static RULES: &[SuggestionRule] = &[
    SuggestionRule {
        matches: |b| contains_ci(&b.medical_diagnosis, "cerebral palsy"),
        goal_type: GoalType::Physiotherapy,
        title: "Improve range of motion (ROM)",
        reason: "Medical diagnosis indicates a mobility impairment",
    },
    SuggestionRule {
        matches: |b| contains_ci(&b.medical_diagnosis, "speech"),
        goal_type: GoalType::Medical,
        title: "Intensive speech-therapy sessions",
        reason: "Medical diagnosis indicates speech difficulties",
    },
    SuggestionRule {
        matches: |b| {
            contains_ci(&b.social_status, "low income") || contains_ci(&b.notes, "low income")
        },
        goal_type: GoalType::Social,
        title: "Study an assistive-device request",
        reason: "Limited family income with a likely equipment need",
    },
    SuggestionRule {
        matches: |b| b.age < SPECIAL_EDUCATION_MAX_AGE,
        goal_type: GoalType::Social,
        title: "Integration into special-education programmes",
        reason: "Age allows educational integration",
    },
];

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Evaluates the rule table against a beneficiary.
pub fn suggest_goals(beneficiary: &Beneficiary) -> Vec<GoalSuggestion> {
    RULES
        .iter()
        .filter(|rule| (rule.matches)(beneficiary))
        .map(|rule| GoalSuggestion {
            goal_type: rule.goal_type,
            title: rule.title.to_owned(),
            reason: rule.reason.to_owned(),
        })
        .collect()
}
