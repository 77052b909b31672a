//! Admission-time clinical snapshot types.
//!
//! These records are written once per admission and are inputs to the
//! validation engine; the workflow engines never mutate them. Draft variants
//! mirror partially-entered form data, with `Option` fields for anything the
//! user has not yet supplied.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary diagnosis category recorded on admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryDiagnosis {
    CerebralPalsy,
    DownSyndrome,
    Autism,
    IntellectualDisability,
    Other,
}

/// Vaccination schedule standing for a beneficiary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccinationStatus {
    UpToDate,
    Overdue,
    Incomplete,
    Pending,
}

/// A complete set of vital signs from one measurement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Body temperature in °C.
    pub temperature: f64,

    /// Resting pulse in beats per minute.
    pub pulse: u16,

    /// Systolic blood pressure in mmHg.
    pub blood_pressure_systolic: u16,

    /// Diastolic blood pressure in mmHg.
    pub blood_pressure_diastolic: u16,

    /// Breaths per minute.
    pub respiratory_rate: u16,

    /// Peripheral oxygen saturation as a percentage.
    pub oxygen_saturation: u8,

    /// When the measurement was taken.
    pub measured_at: DateTime<Utc>,
}

/// Partially-entered vital signs from an in-progress checkup form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsDraft {
    pub temperature: Option<f64>,
    pub pulse: Option<u16>,
    pub blood_pressure_systolic: Option<u16>,
    pub blood_pressure_diastolic: Option<u16>,
    pub respiratory_rate: Option<u16>,
    pub oxygen_saturation: Option<u8>,
}

/// Structured seizure history for beneficiaries with epilepsy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeizureHistory {
    pub has_seizures: bool,
    pub last_seizure_date: Option<NaiveDate>,
    pub frequency: Option<String>,
    pub medication: Option<String>,
}

/// Free-text history buckets collected on admission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub chronic_diseases: Vec<String>,
    pub surgeries: Vec<String>,
    pub allergies: Vec<String>,
    pub family_history: Vec<String>,
    pub seizure_history: Option<SeizureHistory>,
}

/// A medication the beneficiary is currently prescribed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Infection-control standing, populated from the validation engine's actions
/// when the admission record is produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfectionStatus {
    pub suspected_infection: bool,
    pub isolation_recommended: bool,
    pub isolation_reason: Option<String>,
    pub vaccination_status: VaccinationStatus,
    pub last_vaccination_date: Option<NaiveDate>,
}

/// The admission-time clinical snapshot for one beneficiary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedicalProfile {
    pub id: Uuid,
    pub beneficiary_id: Uuid,
    pub admission_date: NaiveDate,

    pub primary_diagnosis: PrimaryDiagnosis,
    pub secondary_diagnoses: Vec<String>,
    pub is_epileptic: bool,

    pub latest_vitals: VitalSigns,
    pub history: MedicalHistory,
    pub current_medications: Vec<Medication>,

    pub infection_status: InfectionStatus,
}

/// A partially-entered admission form.
///
/// The validation engine re-evaluates the full draft on every field change;
/// [`ValidationEngine::admit`](crate::validation::ValidationEngine::admit)
/// converts it into a [`MedicalProfile`] once valid and complete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdmissionDraft {
    pub beneficiary_id: Uuid,
    pub admission_date: NaiveDate,

    pub primary_diagnosis: Option<PrimaryDiagnosis>,
    pub secondary_diagnoses: Vec<String>,
    pub is_epileptic: bool,

    pub history: MedicalHistory,
    pub medications: Vec<Medication>,
    pub vaccination_status: VaccinationStatus,
    pub last_vaccination_date: Option<NaiveDate>,
}

impl AdmissionDraft {
    /// Starts an empty draft for a beneficiary.
    pub fn new(beneficiary_id: Uuid, admission_date: NaiveDate) -> Self {
        Self {
            beneficiary_id,
            admission_date,
            primary_diagnosis: None,
            secondary_diagnoses: Vec::new(),
            is_epileptic: false,
            history: MedicalHistory::default(),
            medications: Vec::new(),
            vaccination_status: VaccinationStatus::Pending,
            last_vaccination_date: None,
        }
    }
}
