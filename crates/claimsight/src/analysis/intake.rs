use serde::Serialize;

pub const MIN_SCENARIO_CHARS: usize = 10;
pub const MAX_SCENARIO_CHARS: usize = 5000;

/// Validation errors raised before any pipeline stage runs. Fatal to the
/// request and surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("scenario text cannot be empty")]
    Empty,
    #[error("scenario text too short (minimum 10 characters)")]
    TooShort,
    #[error("scenario text too long (maximum 5000 characters)")]
    TooLong,
}

/// Validated, whitespace-normalized incident description.
///
/// Construction through [`ScenarioText::parse`] is the only mutation point;
/// every downstream stage receives the cleaned text by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScenarioText(String);

impl ScenarioText {
    /// Bounds are checked against the raw input before normalization, then
    /// runs of whitespace collapse to single spaces.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::Empty);
        }

        let length = raw.chars().count();
        if length < MIN_SCENARIO_CHARS {
            return Err(ValidationError::TooShort);
        }
        if length > MAX_SCENARIO_CHARS {
            return Err(ValidationError::TooLong);
        }

        let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
