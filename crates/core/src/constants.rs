//! Clinical thresholds used by the admission validation rules.
//!
//! These values mirror the centre's daily-checkup protocol: vitals outside
//! the normal ranges require a medical comment, and a temperature above the
//! isolation threshold raises the infection-control advisory.

/// Lowest body temperature (°C) considered normal on a daily checkup.
pub const TEMPERATURE_NORMAL_MIN_C: f64 = 36.0;

/// Highest body temperature (°C) considered normal on a daily checkup.
pub const TEMPERATURE_NORMAL_MAX_C: f64 = 37.5;

/// Temperature (°C) above which the infection-control protocol recommends isolation.
pub const TEMPERATURE_ISOLATION_THRESHOLD_C: f64 = 38.0;

/// Inclusive normal range for systolic blood pressure (mmHg).
pub const SYSTOLIC_NORMAL_MIN: u16 = 90;
pub const SYSTOLIC_NORMAL_MAX: u16 = 140;

/// Inclusive normal range for resting pulse (beats per minute).
pub const PULSE_NORMAL_MIN: u16 = 60;
pub const PULSE_NORMAL_MAX: u16 = 100;

/// Age below which a beneficiary is eligible for special-education integration.
pub const SPECIAL_EDUCATION_MAX_AGE: u8 = 18;
