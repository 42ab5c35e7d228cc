//! Core domain logic for the weekly goal tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod week;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::goal::{CompletionId, Goal, GoalCompletion, GoalId, GoalValidationError};
pub use repo::completion_repo::{CompletedGoal, CompletionRepository, SqliteCompletionRepository};
pub use repo::goal_repo::{GoalRepository, SqliteGoalRepository};
pub use repo::{RepoError, RepoResult};
pub use service::goal_service::{CreateGoalRequest, GoalService};
pub use service::report_service::{
    DayCompletion, PendingGoal, PendingGoalsReport, ReportError, ReportResult, ReportService,
    WeekSummary, DEFAULT_WEEK_START,
};
pub use week::{resolve_week, ClockError, WeekBounds};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
