//! Clinical validation of admission and checkup drafts.
//!
//! The engine is a pure function of the draft, the vitals and the
//! justification comment: every field change re-evaluates the full rule set
//! and returns a fresh [`ValidationResult`]. Failures are field-scoped normal
//! return values, never errors; the caller blocks submission while
//! `is_valid` is false.
//!
//! Rules (evaluated independently):
//! 1. Abnormal vitals require a non-empty medical comment.
//! 2. An epilepsy diagnosis requires the date of the last seizure.
//! 3. Temperature above the isolation threshold raises an advisory
//!    isolation recommendation (never blocks validity).

use crate::clinical::{
    AdmissionDraft, InfectionStatus, MedicalProfile, VitalSigns, VitalsDraft,
};
use crate::constants::{
    PULSE_NORMAL_MAX, PULSE_NORMAL_MIN, SYSTOLIC_NORMAL_MAX, SYSTOLIC_NORMAL_MIN,
    TEMPERATURE_ISOLATION_THRESHOLD_C, TEMPERATURE_NORMAL_MAX_C, TEMPERATURE_NORMAL_MIN_C,
};
use crate::error::{CaseError, CaseResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Field key for the abnormal-vitals rule.
pub const FIELD_CHECKUP: &str = "checkup";

/// Field key for the seizure-history rule.
pub const FIELD_SEIZURE_HISTORY: &str = "seizure_history";

/// Derived safety actions for the caller to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedActions {
    /// Move the beneficiary under the infection-control isolation protocol.
    pub recommend_isolation: bool,

    /// The seizure-history sub-record must be completed before submission.
    pub require_seizure_history: bool,
}

/// Outcome of one validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no blocking errors were found.
    pub is_valid: bool,

    /// Field-scoped blocking errors, keyed by form field.
    pub errors: BTreeMap<String, String>,

    /// Human-readable advisories; never block submission.
    pub warnings: Vec<String>,

    /// Derived safety actions.
    pub actions: RecommendedActions,
}

/// Admission/checkup validation operations.
///
/// This is a zero-sized type used for namespacing; all methods are associated
/// functions and hold no state.
pub struct ValidationEngine;

impl ValidationEngine {
    /// Evaluates the full rule set against a draft.
    ///
    /// Total and side-effect free: identical inputs always produce an
    /// identical result, and absent vitals simply skip the vitals rules.
    ///
    /// # Arguments
    ///
    /// * `profile` - The admission draft as entered so far.
    /// * `vitals` - The in-progress checkup vitals, if a checkup is underway.
    /// * `comment` - The free-text medical justification, if entered.
    pub fn evaluate(
        profile: &AdmissionDraft,
        vitals: Option<&VitalsDraft>,
        comment: Option<&str>,
    ) -> ValidationResult {
        let mut errors = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut actions = RecommendedActions::default();

        // Rule 1: abnormal vitals require a medical comment.
        if let Some(vitals) = vitals {
            if Self::has_abnormal_vitals(vitals) && Self::is_blank(comment) {
                errors.insert(
                    FIELD_CHECKUP.to_string(),
                    "Abnormal vital signs require a medical comment before the checkup can be saved."
                        .to_string(),
                );
            }
        }

        // Rule 2: epilepsy requires a completed seizure history.
        if profile.is_epileptic {
            actions.require_seizure_history = true;
            let last_seizure_recorded = profile
                .history
                .seizure_history
                .as_ref()
                .is_some_and(|h| h.last_seizure_date.is_some());
            if !last_seizure_recorded {
                errors.insert(
                    FIELD_SEIZURE_HISTORY.to_string(),
                    "The date of the last seizure is required for beneficiaries diagnosed with epilepsy."
                        .to_string(),
                );
            }
        }

        // Rule 3: fever raises the isolation advisory. Advisory only.
        if let Some(temperature) = vitals.and_then(|v| v.temperature) {
            if temperature > TEMPERATURE_ISOLATION_THRESHOLD_C {
                actions.recommend_isolation = true;
                warnings.push(format!(
                    "Temperature above {TEMPERATURE_ISOLATION_THRESHOLD_C} °C. Infection-control protocol activated; immediate isolation is recommended."
                ));
            }
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            actions,
        }
    }

    /// Produces the admission record from a valid, complete draft.
    ///
    /// This is the submission gate the admission form calls: it re-runs
    /// [`evaluate`](Self::evaluate) and refuses while the draft is invalid,
    /// then stamps the engine's isolation recommendation into the record's
    /// infection-control fields.
    ///
    /// # Errors
    ///
    /// - `CaseError::ValidationFailed` carrying the field errors while the
    ///   draft is invalid.
    /// - `CaseError::InvalidInput` if the diagnosis or any vital sign is
    ///   still missing.
    pub fn admit(
        profile: &AdmissionDraft,
        vitals: &VitalsDraft,
        comment: Option<&str>,
    ) -> CaseResult<MedicalProfile> {
        let result = Self::evaluate(profile, Some(vitals), comment);
        if !result.is_valid {
            return Err(CaseError::ValidationFailed {
                errors: result.errors,
            });
        }

        let primary_diagnosis = profile.primary_diagnosis.ok_or_else(|| {
            CaseError::InvalidInput("primary diagnosis is required for admission".into())
        })?;
        let latest_vitals = Self::complete_vitals(vitals)?;

        if result.actions.recommend_isolation {
            tracing::warn!(
                beneficiary = %profile.beneficiary_id,
                temperature = ?vitals.temperature,
                "admission recorded with isolation recommended"
            );
        }

        Ok(MedicalProfile {
            id: Uuid::new_v4(),
            beneficiary_id: profile.beneficiary_id,
            admission_date: profile.admission_date,
            primary_diagnosis,
            secondary_diagnoses: profile.secondary_diagnoses.clone(),
            is_epileptic: profile.is_epileptic,
            latest_vitals,
            history: profile.history.clone(),
            current_medications: profile.medications.clone(),
            infection_status: InfectionStatus {
                suspected_infection: result.actions.recommend_isolation,
                isolation_recommended: result.actions.recommend_isolation,
                isolation_reason: result
                    .actions
                    .recommend_isolation
                    .then(|| result.warnings.join(" ")),
                vaccination_status: profile.vaccination_status,
                last_vaccination_date: profile.last_vaccination_date,
            },
        })
    }

    fn has_abnormal_vitals(vitals: &VitalsDraft) -> bool {
        let temperature_abnormal = vitals.temperature.is_some_and(|t| {
            t < TEMPERATURE_NORMAL_MIN_C || t > TEMPERATURE_NORMAL_MAX_C
        });
        let systolic_abnormal = vitals.blood_pressure_systolic.is_some_and(|bp| {
            !(SYSTOLIC_NORMAL_MIN..=SYSTOLIC_NORMAL_MAX).contains(&bp)
        });
        let pulse_abnormal = vitals
            .pulse
            .is_some_and(|p| !(PULSE_NORMAL_MIN..=PULSE_NORMAL_MAX).contains(&p));

        temperature_abnormal || systolic_abnormal || pulse_abnormal
    }

    fn is_blank(comment: Option<&str>) -> bool {
        comment.map_or(true, |c| c.trim().is_empty())
    }

    fn complete_vitals(draft: &VitalsDraft) -> CaseResult<VitalSigns> {
        let missing =
            || CaseError::InvalidInput("vital signs are incomplete for admission".into());
        Ok(VitalSigns {
            temperature: draft.temperature.ok_or_else(missing)?,
            pulse: draft.pulse.ok_or_else(missing)?,
            blood_pressure_systolic: draft.blood_pressure_systolic.ok_or_else(missing)?,
            blood_pressure_diastolic: draft.blood_pressure_diastolic.ok_or_else(missing)?,
            respiratory_rate: draft.respiratory_rate.ok_or_else(missing)?,
            oxygen_saturation: draft.oxygen_saturation.ok_or_else(missing)?,
            measured_at: Utc::now(),
        })
    }
}
