//! Weekly report builders.
//!
//! # Responsibility
//! - Build the pending-goals report: per-goal weekly target vs. completion
//!   count for the current week.
//! - Build the week summary: aggregate completed/total counts plus a
//!   day-by-day completion log.
//!
//! # Invariants
//! - Builders are read-only, stateless and re-entrant; every call resolves
//!   its own week bounds from the caller-supplied `now_ms`.
//! - Goals with zero completions in the window appear with an explicit
//!   count of 0, never absent.
//! - `completed` may exceed `total`: over-completing a goal still counts
//!   every event, while `total` is fixed by the weekly targets.
//! - Collaborator failures propagate unchanged; a report is returned whole
//!   or the call fails.

use crate::model::goal::{CompletionId, GoalId};
use crate::repo::completion_repo::CompletionRepository;
use crate::repo::goal_repo::GoalRepository;
use crate::repo::RepoError;
use crate::week::{self, ClockError};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use log::{error, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Week-start convention used when none is pinned explicitly.
pub const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

pub type ReportResult<T> = Result<T, ReportError>;

/// Failure surface of the report builders.
#[derive(Debug)]
pub enum ReportError {
    /// The underlying store could not be queried.
    Store(RepoError),
    /// The supplied `now_ms` is not a valid instant.
    Clock(ClockError),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Clock(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Clock(err) => Some(err),
        }
    }
}

impl From<RepoError> for ReportError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<ClockError> for ReportError {
    fn from(value: ClockError) -> Self {
        Self::Clock(value)
    }
}

/// One goal's progress toward its weekly target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingGoal {
    pub id: GoalId,
    pub title: String,
    pub desired_weekly_frequency: u8,
    pub completion_count: u32,
}

/// Pending-goals report for one week.
///
/// Serializes as `{ "pendingGoals": [...] }`, the shape consumed by the
/// HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingGoalsReport {
    pub pending_goals: Vec<PendingGoal>,
}

/// One completion event in the day-by-day log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCompletion {
    pub id: CompletionId,
    pub title: String,
    pub completed_at: DateTime<Utc>,
}

/// Aggregate weekly summary.
///
/// `goals_per_day` is sparse: dates with zero completions are omitted. The
/// `BTreeMap` keeps JSON keys as ordered ISO dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub completed: u32,
    pub total: u32,
    pub goals_per_day: BTreeMap<NaiveDate, Vec<DayCompletion>>,
}

/// Read-only report builder over the goal and completion stores.
pub struct ReportService<G: GoalRepository, C: CompletionRepository> {
    goals: G,
    completions: C,
    week_start: Weekday,
}

impl<G: GoalRepository, C: CompletionRepository> ReportService<G, C> {
    /// Creates a builder with the default Sunday week start.
    pub fn new(goals: G, completions: C) -> Self {
        Self::with_week_start(goals, completions, DEFAULT_WEEK_START)
    }

    /// Creates a builder with an explicit week-start day.
    ///
    /// Tests pin this instead of relying on the locale default.
    pub fn with_week_start(goals: G, completions: C, week_start: Weekday) -> Self {
        Self {
            goals,
            completions,
            week_start,
        }
    }

    /// Builds the pending-goals report for the week containing `now_ms`.
    ///
    /// # Contract
    /// - Includes every goal with `created_at <= week end`.
    /// - `completion_count` counts events inside the closed week window,
    ///   defaulting to 0 for goals without any.
    /// - Entry order follows the goal listing; callers needing a stable
    ///   order beyond that must sort explicitly.
    pub fn build_pending_goals_report(&self, now_ms: i64) -> ReportResult<PendingGoalsReport> {
        let started_at = Instant::now();
        match self.pending_goals(now_ms) {
            Ok(report) => {
                info!(
                    "event=pending_report module=service status=ok duration_ms={} goals={}",
                    started_at.elapsed().as_millis(),
                    report.pending_goals.len()
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=pending_report module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Builds the aggregate summary for the week containing `now_ms`.
    ///
    /// # Contract
    /// - `completed` counts every completion in the closed week window.
    /// - `total` sums the weekly targets of every goal with
    ///   `created_at <= week end`, independent of how many were met.
    /// - `goals_per_day` partitions the window's completions by civil date,
    ///   ascending by completion time within a day.
    pub fn build_week_summary_report(&self, now_ms: i64) -> ReportResult<WeekSummary> {
        let started_at = Instant::now();
        match self.week_summary(now_ms) {
            Ok(summary) => {
                info!(
                    "event=week_summary module=service status=ok duration_ms={} completed={} total={}",
                    started_at.elapsed().as_millis(),
                    summary.completed,
                    summary.total
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=week_summary module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn pending_goals(&self, now_ms: i64) -> ReportResult<PendingGoalsReport> {
        let bounds = week::resolve_week(now_ms, self.week_start)?;

        let goals = self.goals.list_goals_created_before(bounds.end_ms)?;
        let counts = self
            .completions
            .count_completions_by_goal(bounds.start_ms, bounds.end_ms)?;

        // Left-outer merge: goals missing from the sparse count mapping get
        // an explicit zero.
        let pending_goals = goals
            .into_iter()
            .map(|goal| PendingGoal {
                completion_count: counts.get(&goal.id).copied().unwrap_or(0),
                id: goal.id,
                title: goal.title,
                desired_weekly_frequency: goal.desired_weekly_frequency,
            })
            .collect();

        Ok(PendingGoalsReport { pending_goals })
    }

    fn week_summary(&self, now_ms: i64) -> ReportResult<WeekSummary> {
        let bounds = week::resolve_week(now_ms, self.week_start)?;

        let completions = self
            .completions
            .list_completions_in_range(bounds.start_ms, bounds.end_ms)?;
        let goals = self.goals.list_goals_created_before(bounds.end_ms)?;

        let completed = u32::try_from(completions.len()).unwrap_or(u32::MAX);
        let total = goals
            .iter()
            .map(|goal| u32::from(goal.desired_weekly_frequency))
            .sum();

        let mut goals_per_day: BTreeMap<NaiveDate, Vec<DayCompletion>> = BTreeMap::new();
        for completion in completions {
            let date = week::date_of(completion.completed_at)?;
            goals_per_day.entry(date).or_default().push(DayCompletion {
                id: completion.id,
                title: completion.title,
                completed_at: week::instant_of(completion.completed_at)?,
            });
        }

        Ok(WeekSummary {
            completed,
            total,
            goals_per_day,
        })
    }
}
