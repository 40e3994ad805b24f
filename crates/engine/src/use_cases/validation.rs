//! Common validation helpers for use cases.

use cookflow_domain::ProgressUpdate;
use serde::Deserialize;
use serde_json::Value;

/// Validation error type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("one of {first} or {second} is required")]
    MissingOneOf {
        first: &'static str,
        second: &'static str,
    },

    #[error("{first} and {second} cannot be combined")]
    MutuallyExclusive {
        first: &'static str,
        second: &'static str,
    },

    #[error("{field_name} must be an integer")]
    NotAnInteger { field_name: &'static str },

    #[error("{field_name} is invalid: {reason}")]
    Invalid {
        field_name: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// The offending field, or the first of a field pair.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::MissingOneOf { first, .. } | Self::MutuallyExclusive { first, .. } => first,
            Self::NotAnInteger { field_name } | Self::Invalid { field_name, .. } => field_name,
        }
    }
}

pub const DELTA_FIELD: &str = "delta";
pub const COMPLETED_COUNT_FIELD: &str = "completed_count";

/// Raw manual-update payload as it arrives at the boundary.
///
/// Both fields stay untyped until [`ProgressUpdateInput::parse`] so a wrong
/// type can be reported against the field that carried it. JSON `null` counts
/// as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressUpdateInput {
    #[serde(default)]
    pub delta: Option<Value>,
    #[serde(default)]
    pub completed_count: Option<Value>,
}

impl ProgressUpdateInput {
    pub fn delta(value: impl Into<Value>) -> Self {
        Self {
            delta: Some(value.into()),
            completed_count: None,
        }
    }

    pub fn completed_count(value: impl Into<Value>) -> Self {
        Self {
            delta: None,
            completed_count: Some(value.into()),
        }
    }

    /// Resolve to exactly one update path.
    pub fn parse(&self) -> Result<ProgressUpdate, ValidationError> {
        match (&self.delta, &self.completed_count) {
            (None, None) => Err(ValidationError::MissingOneOf {
                first: DELTA_FIELD,
                second: COMPLETED_COUNT_FIELD,
            }),
            (Some(_), Some(_)) => Err(ValidationError::MutuallyExclusive {
                first: DELTA_FIELD,
                second: COMPLETED_COUNT_FIELD,
            }),
            (Some(delta), None) => {
                let value = require_integer(delta, DELTA_FIELD)?;
                require_positive(value, DELTA_FIELD)?;
                ProgressUpdate::delta(value).map_err(|e| invalid(DELTA_FIELD, e))
            }
            (None, Some(count)) => {
                let value = require_integer(count, COMPLETED_COUNT_FIELD)?;
                require_non_negative(value, COMPLETED_COUNT_FIELD)?;
                ProgressUpdate::set_count(value).map_err(|e| invalid(COMPLETED_COUNT_FIELD, e))
            }
        }
    }
}

/// Accept JSON integers, integral floats and numeric strings.
pub fn require_integer(value: &Value, field_name: &'static str) -> Result<i64, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or(ValidationError::NotAnInteger { field_name })
}

/// Validate an integer is strictly positive.
pub fn require_positive(value: i64, field_name: &'static str) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::Invalid {
            field_name,
            reason: "must be > 0".to_string(),
        });
    }
    Ok(())
}

/// Validate an integer is zero or more.
pub fn require_non_negative(value: i64, field_name: &'static str) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Invalid {
            field_name,
            reason: "must be >= 0".to_string(),
        });
    }
    Ok(())
}

fn invalid(field_name: &'static str, error: impl ToString) -> ValidationError {
    ValidationError::Invalid {
        field_name,
        reason: error.to_string(),
    }
}
