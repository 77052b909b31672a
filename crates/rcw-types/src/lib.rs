//! Validated primitive types shared across the RCW workspace.
//!
//! These are small newtypes whose constructors enforce the invariant once, so
//! downstream code can rely on it without re-checking.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when creating a [`Progress`] value.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// The input was outside the inclusive 0–100 range
    #[error("Progress must be between 0 and 100, got {0}")]
    OutOfRange(u16),
}

/// A percentage-of-completion value guaranteed to lie in the inclusive range 0–100.
///
/// Used for goal tracking, where progress is recorded against a measurable
/// criterion. The bound is enforced at construction so arithmetic downstream
/// never has to saturate or clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Progress(u8);

impl Progress {
    /// Progress of a goal that has not been started.
    pub const ZERO: Progress = Progress(0);

    /// Progress of a fully achieved goal.
    pub const COMPLETE: Progress = Progress(100);

    /// Creates a new `Progress` from a percentage value.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::OutOfRange` if `value` exceeds 100.
    pub fn new(value: u16) -> Result<Self, ProgressError> {
        if value > 100 {
            return Err(ProgressError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    /// Returns the percentage as an integer in 0–100.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether this value represents full completion.
    pub fn is_complete(&self) -> bool {
        self.0 == 100
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl serde::Serialize for Progress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Progress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u16::deserialize(deserializer)?;
        Progress::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_whitespace() {
        let text = NonEmptyText::new("  Khalid  ").expect("non-empty after trim");
        assert_eq!(text.as_str(), "Khalid");
    }

    #[test]
    fn non_empty_text_rejects_whitespace_only() {
        let err = NonEmptyText::new("   ").expect_err("whitespace-only should fail");
        assert!(matches!(err, TextError::Empty));
    }

    #[test]
    fn progress_accepts_bounds() {
        assert_eq!(Progress::new(0).expect("zero is valid"), Progress::ZERO);
        assert_eq!(
            Progress::new(100).expect("one hundred is valid"),
            Progress::COMPLETE
        );
    }

    #[test]
    fn progress_rejects_out_of_range() {
        let err = Progress::new(101).expect_err("101 should fail");
        assert!(matches!(err, ProgressError::OutOfRange(101)));
    }

    #[test]
    fn progress_round_trips_through_serde() {
        let progress = Progress::new(40).expect("valid progress");
        let json = serde_json::to_string(&progress).expect("serialize");
        assert_eq!(json, "40");
        let back: Progress = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, progress);
    }

    #[test]
    fn progress_deserialize_rejects_out_of_range() {
        let result: Result<Progress, _> = serde_json::from_str("150");
        assert!(result.is_err());
    }
}
