//! Goal and completion creation use-cases.
//!
//! # Responsibility
//! - Provide the two write entry points: register a goal, record one
//!   completion.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - The caller supplies `now_ms` explicitly; this layer reads no ambient
//!   clock.

use crate::model::goal::{CompletionId, Goal, GoalCompletion, GoalId};
use crate::repo::completion_repo::CompletionRepository;
use crate::repo::goal_repo::GoalRepository;
use crate::repo::RepoResult;

/// Request model for registering a new goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGoalRequest {
    /// Display text for the goal.
    pub title: String,
    /// Target completions per week, 1..=7.
    pub desired_weekly_frequency: u8,
}

/// Use-case service wrapper for the write paths.
pub struct GoalService<G: GoalRepository, C: CompletionRepository> {
    goals: G,
    completions: C,
}

impl<G: GoalRepository, C: CompletionRepository> GoalService<G, C> {
    /// Creates a service using the provided repository implementations.
    pub fn new(goals: G, completions: C) -> Self {
        Self { goals, completions }
    }

    /// Registers a new goal with a fresh stable ID.
    ///
    /// Returns repository validation errors unchanged.
    pub fn create_goal(&self, request: &CreateGoalRequest, now_ms: i64) -> RepoResult<GoalId> {
        let goal = Goal::new(
            request.title.clone(),
            request.desired_weekly_frequency,
            now_ms,
        );
        self.goals.create_goal(&goal)
    }

    /// Records one completion event for an existing goal.
    ///
    /// Fails with `UnknownGoal` when `goal_id` is not stored.
    pub fn complete_goal(&self, goal_id: GoalId, now_ms: i64) -> RepoResult<CompletionId> {
        let completion = GoalCompletion::new(goal_id, now_ms);
        self.completions.create_completion(&completion)
    }
}
