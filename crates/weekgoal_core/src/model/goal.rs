//! Goal and completion domain records.
//!
//! # Responsibility
//! - Define the two stored entities: `Goal` and `GoalCompletion`.
//! - Enforce creation-time invariants via `validate()`.
//!
//! # Invariants
//! - `desired_weekly_frequency` is between 1 and 7 inclusive.
//! - `title` is never blank.
//! - Timestamps are Unix epoch milliseconds, UTC.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a goal.
pub type GoalId = Uuid;

/// Stable identifier for a single completion event.
pub type CompletionId = Uuid;

/// Highest allowed weekly target; one completion per calendar day.
pub const MAX_WEEKLY_FREQUENCY: u8 = 7;

/// Validation error for goal creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyTitle,
    FrequencyOutOfRange(u8),
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "goal title cannot be blank"),
            Self::FrequencyOutOfRange(value) => write!(
                f,
                "desired weekly frequency must be between 1 and {MAX_WEEKLY_FREQUENCY}, got {value}"
            ),
        }
    }
}

impl Error for GoalValidationError {}

/// A recurring personal goal with a weekly completion target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Stable global ID used for linking completions and auditing.
    pub id: GoalId,
    /// Display text shown to the user.
    pub title: String,
    /// Target number of completions per calendar week, 1..=7.
    pub desired_weekly_frequency: u8,
    /// Unix epoch milliseconds at creation.
    pub created_at: i64,
}

impl Goal {
    /// Creates a goal with a generated stable ID.
    pub fn new(title: impl Into<String>, desired_weekly_frequency: u8, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), title, desired_weekly_frequency, created_at)
    }

    /// Creates a goal with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: GoalId,
        title: impl Into<String>,
        desired_weekly_frequency: u8,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            desired_weekly_frequency,
            created_at,
        }
    }

    /// Checks creation-time invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank after trimming.
    /// - `FrequencyOutOfRange` when the weekly target is 0 or above 7.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        if self.desired_weekly_frequency == 0
            || self.desired_weekly_frequency > MAX_WEEKLY_FREQUENCY
        {
            return Err(GoalValidationError::FrequencyOutOfRange(
                self.desired_weekly_frequency,
            ));
        }
        Ok(())
    }
}

/// One timestamped event recording that a goal was done once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCompletion {
    /// Stable global ID of this completion event.
    pub id: CompletionId,
    /// Owning goal. Many completions may reference one goal.
    pub goal_id: GoalId,
    /// Unix epoch milliseconds at completion.
    pub created_at: i64,
}

impl GoalCompletion {
    /// Creates a completion event with a generated stable ID.
    pub fn new(goal_id: GoalId, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Goal, GoalValidationError};

    #[test]
    fn validate_accepts_frequency_range_bounds() {
        assert!(Goal::new("read", 1, 0).validate().is_ok());
        assert!(Goal::new("read", 7, 0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_and_excess_frequency() {
        assert_eq!(
            Goal::new("read", 0, 0).validate(),
            Err(GoalValidationError::FrequencyOutOfRange(0))
        );
        assert_eq!(
            Goal::new("read", 8, 0).validate(),
            Err(GoalValidationError::FrequencyOutOfRange(8))
        );
    }

    #[test]
    fn validate_rejects_blank_title() {
        assert_eq!(
            Goal::new("   ", 3, 0).validate(),
            Err(GoalValidationError::EmptyTitle)
        );
    }
}
